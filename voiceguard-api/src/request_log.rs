//! In-memory request log
//!
//! Keeps the most recent requests (endpoint, outcome, time) for `GET /logs/`.
//! Nothing is persisted; the log starts empty on every launch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use voiceguard_common::time;

use crate::error::ApiError;

/// Entries kept before the oldest is evicted
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Request outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Error,
    BadRequest,
    Unauthorized,
}

impl LogStatus {
    /// Outcome recorded for a failed request
    pub fn for_error(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => LogStatus::Unauthorized,
            err if err.is_client_error() => LogStatus::BadRequest,
            _ => LogStatus::Error,
        }
    }
}

/// One logged request
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub endpoint: String,
    pub status: LogStatus,
    /// `YYYY-MM-DD HH:MM:SS UTC`
    pub time: String,
}

impl LogEntry {
    fn at(endpoint: &str, status: LogStatus, when: DateTime<Utc>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            status,
            time: time::format_log_time(when),
        }
    }
}

/// Capped request log, cheap to clone
#[derive(Debug, Clone)]
pub struct RequestLog {
    entries: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl RequestLog {
    /// `capacity` of zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest once full
    pub async fn record(&self, endpoint: &str, status: LogStatus) {
        let entry = LogEntry::at(endpoint, status, time::now());
        tracing::debug!(endpoint = %entry.endpoint, status = ?status, "Request logged");

        let mut entries = self.entries.write().await;
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Record the outcome of a handler result
    pub async fn record_outcome<T>(&self, endpoint: &str, outcome: &Result<T, ApiError>) {
        let status = match outcome {
            Ok(_) => LogStatus::Success,
            Err(err) => LogStatus::for_error(err),
        };
        self.record(endpoint, status).await;
    }

    /// Snapshot, oldest first
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voiceguard_common::api::ApiKeyError;

    #[tokio::test]
    async fn test_record_and_read_back() {
        let log = RequestLog::default();
        assert!(log.is_empty().await);

        log.record("/predict/", LogStatus::Success).await;
        log.record("/health/", LogStatus::Success).await;

        let entries = log.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].endpoint, "/predict/");
        assert_eq!(entries[1].endpoint, "/health/");
        assert!(entries[0].time.ends_with(" UTC"));
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let log = RequestLog::with_capacity(3);
        for i in 0..5 {
            log.record(&format!("/e{}/", i), LogStatus::Success).await;
        }

        let endpoints: Vec<String> = log.entries().await.into_iter().map(|e| e.endpoint).collect();
        assert_eq!(endpoints, vec!["/e2/", "/e3/", "/e4/"]);
        assert_eq!(log.len().await, 3);
    }

    #[tokio::test]
    async fn test_default_capacity() {
        let log = RequestLog::default();
        for _ in 0..60 {
            log.record("/health/", LogStatus::Success).await;
        }
        assert_eq!(log.len().await, DEFAULT_LOG_CAPACITY);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let log = RequestLog::default();
        let other = log.clone();
        other.record("/logs/", LogStatus::Error).await;
        assert_eq!(log.len().await, 1);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&LogStatus::BadRequest).unwrap(), "\"bad_request\"");
        assert_eq!(serde_json::to_string(&LogStatus::Unauthorized).unwrap(), "\"unauthorized\"");
    }

    #[test]
    fn test_status_for_error() {
        assert_eq!(
            LogStatus::for_error(&ApiError::Unauthorized(ApiKeyError::Missing)),
            LogStatus::Unauthorized
        );
        assert_eq!(
            LogStatus::for_error(&ApiError::BadRequest("x".into())),
            LogStatus::BadRequest
        );
        assert_eq!(
            LogStatus::for_error(&ApiError::Processing("x".into())),
            LogStatus::Error
        );
    }

    #[test]
    fn test_entry_time_format() {
        let when = DateTime::parse_from_rfc3339("2024-03-05T07:08:09Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = LogEntry::at("/predict/", LogStatus::Success, when);
        assert_eq!(entry.time, "2024-03-05 07:08:09 UTC");
    }
}
