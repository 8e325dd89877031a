//! Fallback classifier used when no model file is deployed

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use super::{Classifier, ClassifierError, Prediction, VoiceLabel};
use crate::features::FeatureVector;

const MIN_CONFIDENCE: f64 = 70.0;
const MAX_CONFIDENCE: f64 = 95.0;

/// Returns a random label with confidence uniform in `[70, 95)`
///
/// Features are ignored. Seed it with [`RandomClassifier::with_seed`] for
/// reproducible output in tests.
pub struct RandomClassifier {
    rng: Mutex<StdRng>,
}

impl RandomClassifier {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RandomClassifier {
    fn name(&self) -> &str {
        "random"
    }

    fn predict(&self, _features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        // A poisoned lock only means another request panicked mid-draw
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let label = if rng.gen_bool(0.5) {
            VoiceLabel::Ai
        } else {
            VoiceLabel::Human
        };
        let confidence = rng.gen_range(MIN_CONFIDENCE..MAX_CONFIDENCE);

        Ok(Prediction::new(label, confidence))
    }
}
