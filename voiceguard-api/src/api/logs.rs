//! GET /logs/
//!
//! Reading the log does not add an entry to it.

use axum::{extract::State, routing::get, Json, Router};

use super::types::LogsResponse;
use crate::AppState;

pub const LOGS_PATH: &str = "/logs/";

pub async fn get_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    let logs = state.request_log.entries().await;
    Json(LogsResponse {
        count: logs.len(),
        logs,
    })
}

pub fn logs_routes() -> Router<AppState> {
    Router::new().route(LOGS_PATH, get(get_logs))
}
