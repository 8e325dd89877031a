//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Format used for request log entries, e.g. `2025-01-31 14:05:09 UTC`
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Render a timestamp in request log format
pub fn format_log_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format(LOG_TIME_FORMAT).to_string()
}

/// Whole seconds elapsed since `since`, clamped at zero
pub fn seconds_since(since: DateTime<Utc>) -> u64 {
    now().signed_duration_since(since).num_seconds().max(0) as u64
}
