//! Logistic-regression classifier loaded from JSON
//!
//! Model file layout:
//!
//! ```json
//! {
//!   "feature_count": 83,
//!   "scaler": { "mean": [...], "scale": [...] },
//!   "coefficients": [...],
//!   "intercept": -0.42,
//!   "threshold": 0.5
//! }
//! ```
//!
//! `scaler` and `threshold` are optional. The positive class is "AI".

use serde::Deserialize;
use std::path::Path;

use super::{Classifier, ClassifierError, Prediction, VoiceLabel};
use crate::features::FeatureVector;

/// Per-feature standardization applied before the linear model
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Serialized logistic-regression model
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub feature_count: usize,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl LinearModel {
    fn validate(&self) -> Result<(), ClassifierError> {
        if self.coefficients.len() != self.feature_count {
            return Err(ClassifierError::InvalidModel(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_count
            )));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != self.feature_count || scaler.scale.len() != self.feature_count {
                return Err(ClassifierError::InvalidModel(
                    "scaler length does not match feature_count".to_string(),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ClassifierError::InvalidModel(format!(
                "threshold {} outside 0..=1",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Probability that the clip is AI-generated
    pub fn probability_ai(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if features.len() != self.feature_count {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.feature_count,
                actual: features.len(),
            });
        }

        let logit = features
            .iter()
            .enumerate()
            .map(|(i, &x)| self.standardize(i, x) * self.coefficients[i])
            .sum::<f64>()
            + self.intercept;

        Ok(sigmoid(logit))
    }

    fn standardize(&self, index: usize, value: f64) -> f64 {
        match &self.scaler {
            Some(scaler) => {
                let scale = scaler.scale[index];
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (value - scaler.mean[index]) / scale
            }
            None => value,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Classifier backed by a [`LinearModel`]
#[derive(Debug, Clone)]
pub struct LinearModelClassifier {
    model: LinearModel,
}

impl LinearModelClassifier {
    pub fn new(model: LinearModel) -> Result<Self, ClassifierError> {
        model.validate()?;
        Ok(Self { model })
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: LinearModel =
            serde_json::from_str(json).map_err(|e| ClassifierError::InvalidModel(e.to_string()))?;
        Self::new(model)
    }

    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let json = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

impl Classifier for LinearModelClassifier {
    fn name(&self) -> &str {
        "linear-model"
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        let p_ai = self.model.probability_ai(features.as_slice())?;
        let label = if p_ai >= self.model.threshold {
            VoiceLabel::Ai
        } else {
            VoiceLabel::Human
        };

        tracing::debug!(p_ai = p_ai, label = %label, "Linear model prediction");

        Ok(Prediction::new(label, p_ai.max(1.0 - p_ai) * 100.0))
    }
}
