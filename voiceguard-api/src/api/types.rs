//! Request and response bodies

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audio::DEFAULT_AUDIO_FORMAT;
use crate::classifier::{Prediction, VoiceLabel};
use crate::error::{ApiError, ApiResult};
use crate::language::DEFAULT_LANGUAGE;
use crate::request_log::LogEntry;
use crate::services::AudioSource;

/// Value of `status` in successful responses
pub const STATUS_SUCCESS: &str = "success";

/// Body of `POST /predict/` and `POST /detect-language/`
///
/// `audio_base64` stays untyped so a non-string payload surfaces as a base64
/// error rather than a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AudioRequest {
    #[serde(default)]
    pub audio_base64: Option<Value>,
    #[serde(default)]
    pub audio_format: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Used only when `audio_base64` is absent or empty
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl AudioRequest {
    /// Parse a raw body; an empty body is an empty request
    ///
    /// The content type is not checked.
    pub fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
    }

    /// Requested format, `mp3` only when the field is absent
    pub fn audio_format(&self) -> &str {
        self.audio_format.as_deref().unwrap_or(DEFAULT_AUDIO_FORMAT)
    }

    /// Language hint, `English` only when the field is absent
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Audio to process, base64 taking precedence over a URL
    pub fn source(&self) -> ApiResult<AudioSource> {
        match &self.audio_base64 {
            Some(Value::String(payload)) if !payload.trim().is_empty() => {
                return Ok(AudioSource::Base64(payload.clone()));
            }
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => {
                return Err(ApiError::Processing(format!(
                    "Invalid base64 audio: expected a string, got {}",
                    json_type(other)
                )));
            }
        }

        match self.audio_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(AudioSource::Url(url.to_string())),
            _ => Err(ApiError::BadRequest("audio_base64 is required".to_string())),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read and parse an audio request body
pub fn audio_request(body: Result<Bytes, BytesRejection>) -> ApiResult<AudioRequest> {
    let bytes = body.map_err(|rejection| ApiError::Rejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    AudioRequest::from_body(&bytes)
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: VoiceLabel,
    pub confidence: f64,
    pub language: String,
    pub status: &'static str,
}

impl PredictResponse {
    pub fn new(prediction: Prediction, language: &str) -> Self {
        Self {
            prediction: prediction.label,
            confidence: prediction.confidence,
            language: language.to_string(),
            status: STATUS_SUCCESS,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub language: &'static str,
    pub audio_format: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "running" while the process serves requests
    pub status: &'static str,
    pub service: String,
    /// Crate version from Cargo.toml
    pub version: &'static str,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn request(json: &str) -> AudioRequest {
        AudioRequest::from_body(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_defaults_when_absent() {
        let req = request(r#"{"audio_base64": "AAAA"}"#);
        assert_eq!(req.audio_format(), "mp3");
        assert_eq!(req.language(), "English");
    }

    #[test]
    fn test_blank_values_kept() {
        let req = request(r#"{"audio_base64": "AAAA", "audio_format": "", "language": ""}"#);
        assert_eq!(req.audio_format(), "");
        assert_eq!(req.language(), "");
    }

    #[test]
    fn test_source_precedence() {
        let req = request(r#"{"audio_base64": "AAAA", "audio_url": "http://x/a.mp3"}"#);
        assert_eq!(req.source().unwrap(), AudioSource::Base64("AAAA".into()));

        let req = request(r#"{"audio_base64": "", "audio_url": "http://x/a.mp3"}"#);
        assert_eq!(req.source().unwrap(), AudioSource::Url("http://x/a.mp3".into()));
    }

    #[test]
    fn test_missing_audio() {
        let err = request(r#"{"language": "Tamil"}"#).source().unwrap_err();
        assert_eq!(err.to_string(), "audio_base64 is required");

        let err = request(r#"{"audio_base64": null}"#).source().unwrap_err();
        assert_eq!(err.to_string(), "audio_base64 is required");
    }

    #[test]
    fn test_non_string_audio_is_base64_error() {
        let err = request(r#"{"audio_base64": 123}"#).source().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Invalid base64 audio: expected a string, got number");
    }

    #[test]
    fn test_empty_body_is_empty_request() {
        let req = AudioRequest::from_body(b"").unwrap();
        assert!(req.audio_base64.is_none());
        assert_eq!(req.source().unwrap_err().to_string(), "audio_base64 is required");
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let err = AudioRequest::from_body(b"{\"audio_base64\": ").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid JSON body"));

        let err = AudioRequest::from_body(b"[1, 2]").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let req = request(r#"{"audio_base64": "AAAA", "extra": 1}"#);
        assert!(req.source().is_ok());
    }
}
