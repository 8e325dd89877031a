//! voiceguard-api library - AI voice detection service
//!
//! Classifies audio clips as AI-generated or human from MFCC and spectral
//! features. See [`build_router`] for the HTTP surface.

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use voiceguard_common::config::ServiceConfig;

pub mod api;
pub mod audio;
pub mod classifier;
pub mod error;
pub mod features;
pub mod language;
pub mod request_log;
pub mod services;

pub use error::{ApiError, ApiResult};

use classifier::Classifier;
use request_log::RequestLog;
use services::DetectionService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration
    pub config: Arc<ServiceConfig>,
    /// Detection pipeline with the classifier loaded at startup
    pub detector: Arc<DetectionService>,
    /// Recent requests for `GET /logs/`
    pub request_log: RequestLog,
    /// Service startup timestamp (for uptime calculation)
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServiceConfig, classifier: Arc<dyn Classifier>) -> anyhow::Result<Self> {
        let detector = DetectionService::new(&config, classifier)?;
        Ok(Self {
            config: Arc::new(config),
            detector: Arc::new(detector),
            request_log: RequestLog::default(),
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
///
/// Every route sits behind the API-key middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .merge(api::predict_routes())
        .merge(api::language_routes())
        .merge(api::health_routes())
        .merge(api::logs_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
