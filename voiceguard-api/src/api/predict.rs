//! POST /predict/

use axum::body::Bytes;
use axum::extract::{rejection::BytesRejection, State};
use axum::{routing::post, Json, Router};

use super::types::{audio_request, PredictResponse};
use crate::error::ApiResult;
use crate::AppState;

pub const PREDICT_PATH: &str = "/predict/";

/// Classify a clip as AI-generated or human
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<PredictResponse>> {
    let outcome = run_prediction(&state, body).await;
    state.request_log.record_outcome(PREDICT_PATH, &outcome).await;
    outcome.map(Json)
}

async fn run_prediction(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<PredictResponse> {
    let request = audio_request(body)?;
    let source = request.source()?;

    let prediction = state.detector.detect(source, request.audio_format()).await?;

    Ok(PredictResponse::new(prediction, request.language()))
}

pub fn predict_routes() -> Router<AppState> {
    Router::new().route(PREDICT_PATH, post(predict))
}
