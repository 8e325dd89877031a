//! # VoiceGuard Common Library
//!
//! Shared code for the VoiceGuard service crates:
//! - Error types
//! - Configuration loading and resolution
//! - API key validation
//! - Timestamp utilities

pub mod api;
pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
