//! API-key middleware
//!
//! Every route requires `x-api-key` to match the configured key. Rejections
//! are answered with 401 `{"error": ...}` and recorded in the request log.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use voiceguard_common::api::{validate_api_key, API_KEY_HEADER};

use crate::error::ApiError;
use crate::request_log::LogStatus;
use crate::AppState;

/// Authentication middleware
///
/// Applied with `route_layer`, so unknown paths still fall through to 404.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(err) = validate_api_key(provided, &state.config.api_key) {
        let endpoint = request
            .extensions()
            .get::<MatchedPath>()
            .map(|path| path.as_str().to_string())
            .unwrap_or_else(|| request.uri().path().to_string());

        tracing::warn!(endpoint = %endpoint, reason = %err, "Rejected request");
        state.request_log.record(&endpoint, LogStatus::Unauthorized).await;

        return Err(ApiError::Unauthorized(err));
    }

    Ok(next.run(request).await)
}
