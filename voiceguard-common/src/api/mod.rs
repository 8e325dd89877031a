//! API module for shared HTTP API functionality
//!
//! Contains ONLY pure functions and shared constants. The service crate wraps
//! these with framework-specific middleware (Axum).

pub mod auth;

pub use auth::{validate_api_key, ApiKeyError, API_KEY_HEADER};
