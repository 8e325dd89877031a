//! POST /detect-language/
//!
//! No language identification happens here: the clip is validated and the
//! hint is clamped to a supported language.

use axum::body::Bytes;
use axum::extract::{rejection::BytesRejection, State};
use axum::{routing::post, Json, Router};

use super::types::{audio_request, LanguageResponse, STATUS_SUCCESS};
use crate::error::ApiResult;
use crate::language::resolve_language;
use crate::AppState;

pub const DETECT_LANGUAGE_PATH: &str = "/detect-language/";

pub async fn detect_language(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<LanguageResponse>> {
    let outcome = run_detection(&state, body).await;
    state.request_log.record_outcome(DETECT_LANGUAGE_PATH, &outcome).await;
    outcome.map(Json)
}

async fn run_detection(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<LanguageResponse> {
    let request = audio_request(body)?;
    let source = request.source()?;

    state.detector.validate_audio(source, request.audio_format()).await?;

    Ok(LanguageResponse {
        language: resolve_language(request.language.as_deref()),
        audio_format: request.audio_format().to_string(),
        status: STATUS_SUCCESS,
    })
}

pub fn language_routes() -> Router<AppState> {
    Router::new().route(DETECT_LANGUAGE_PATH, post(detect_language))
}
