//! Services behind the HTTP handlers

pub mod detector;

pub use detector::{AudioSource, DetectionService};
