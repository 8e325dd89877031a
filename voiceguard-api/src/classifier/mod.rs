//! AI-vs-human voice classification
//!
//! Two implementations sit behind the [`Classifier`] trait:
//! - [`LinearModelClassifier`]: pre-trained logistic regression loaded from a
//!   JSON model file
//! - [`RandomClassifier`]: pseudo-random label and confidence, used when no
//!   model file is deployed (development / testing)
//!
//! [`load_classifier`] picks one at startup.

pub mod linear_model;
pub mod random;

pub use linear_model::{LinearModel, LinearModelClassifier, StandardScaler};
pub use random::RandomClassifier;

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::features::FeatureVector;

/// Classification outcome label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoiceLabel {
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "Human")]
    Human,
}

impl VoiceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceLabel::Ai => "AI",
            VoiceLabel::Human => "Human",
        }
    }
}

impl std::fmt::Display for VoiceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label plus confidence in percent (0-100, two decimals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: VoiceLabel,
    pub confidence: f64,
}

impl Prediction {
    /// Build a prediction from a confidence in percent, rounded to 2 decimals
    pub fn new(label: VoiceLabel, confidence_percent: f64) -> Self {
        Self {
            label,
            confidence: round2(confidence_percent.clamp(0.0, 100.0)),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classifier failures
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Voice classifier
pub trait Classifier: Send + Sync {
    /// Short identifier for logs and health output
    fn name(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError>;
}

/// Choose the classifier for this process
///
/// - `model_path` set and the file exists → [`LinearModelClassifier`]
///   (load errors are fatal)
/// - otherwise → [`RandomClassifier`], with a warning
pub fn load_classifier(model_path: Option<&Path>) -> Result<Arc<dyn Classifier>, ClassifierError> {
    match model_path {
        Some(path) if path.exists() => {
            let classifier = LinearModelClassifier::from_file(path)?;
            tracing::info!(
                path = %path.display(),
                features = classifier.model().feature_count,
                "Loaded classifier model"
            );
            Ok(Arc::new(classifier))
        }
        Some(path) => {
            tracing::warn!(
                path = %path.display(),
                "Model file not found, using random classifier"
            );
            Ok(Arc::new(RandomClassifier::new()))
        }
        None => {
            tracing::warn!("No model configured, using random classifier");
            Ok(Arc::new(RandomClassifier::new()))
        }
    }
}
