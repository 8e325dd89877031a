//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use voiceguard_common::time;

use super::types::HealthResponse;
use crate::request_log::LogStatus;
use crate::AppState;

pub const HEALTH_PATH: &str = "/health/";

/// GET /health/
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    state.request_log.record(HEALTH_PATH, LogStatus::Success).await;

    Json(HealthResponse {
        status: "running",
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: time::seconds_since(state.startup_time),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route(HEALTH_PATH, get(health_check))
}
