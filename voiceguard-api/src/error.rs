//! Error types for voiceguard-api
//!
//! Every failure is reported to clients as `{"error": "<message>"}` with the
//! status code picked by [`ApiError::status_code`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use voiceguard_common::api::ApiKeyError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong `x-api-key` (401)
    #[error("{0}")]
    Unauthorized(#[from] ApiKeyError),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Body could not be read: over the size limit (413) or cut short (400)
    #[error("Invalid request body: {message}")]
    Rejected { status: StatusCode, message: String },

    /// Audio could not be ingested, analysed or classified (500)
    #[error("{0}")]
    Processing(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures caused by the client's request rather than by processing
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized(ApiKeyError::Missing).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Processing("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Rejected {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: "too big".into()
            }
            .status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_messages_are_not_prefixed() {
        assert_eq!(
            ApiError::Unauthorized(ApiKeyError::Invalid).to_string(),
            "Invalid API key"
        );
        assert_eq!(
            ApiError::BadRequest("audio_base64 is required".into()).to_string(),
            "audio_base64 is required"
        );
    }
}
