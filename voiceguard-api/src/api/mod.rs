//! HTTP API handlers

pub mod auth;
pub mod health;
pub mod language;
pub mod logs;
pub mod predict;
pub mod types;

pub use auth::auth_middleware;
pub use health::health_routes;
pub use language::language_routes;
pub use logs::logs_routes;
pub use predict::predict_routes;
