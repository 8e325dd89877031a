//! Acoustic feature extraction
//!
//! Turns a decoded clip into the fixed-length vector the classifier consumes:
//!
//! | index                  | feature                         |
//! |------------------------|---------------------------------|
//! | `0..n_mfcc`            | mean of each MFCC coefficient   |
//! | `n_mfcc..2*n_mfcc`     | std-dev of each MFCC coefficient|
//! | `2*n_mfcc`             | mean spectral centroid (Hz)     |
//! | `2*n_mfcc + 1`         | mean spectral rolloff (Hz)      |
//! | `2*n_mfcc + 2`         | mean zero-crossing rate         |
//!
//! Analysis parameters match librosa's defaults (n_fft 2048, hop 512, 128
//! Slaney mel bands, 85 % rolloff) so models trained on librosa features can
//! be served unchanged.

pub mod mel;
pub mod mfcc;
pub mod spectral;
pub mod stft;

use anyhow::{Context, Result};
use std::path::Path;
use voiceguard_common::config::FeatureSettings;

use crate::audio::{decode_audio_file, resample_mono};

/// Feature extraction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    /// Analysis sample rate; audio is resampled to this first
    pub sample_rate: u32,
    /// Only the first `max_duration_secs` are analysed
    pub max_duration_secs: f64,
    pub n_mfcc: usize,
    pub n_mels: usize,
    pub n_fft: usize,
    pub hop_length: usize,
    pub rolloff_percent: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::from_settings(&FeatureSettings::default())
    }
}

impl FeatureConfig {
    pub fn from_settings(settings: &FeatureSettings) -> Self {
        Self {
            sample_rate: settings.sample_rate,
            max_duration_secs: settings.max_duration_secs,
            n_mfcc: settings.n_mfcc,
            n_mels: 128,
            n_fft: 2048,
            hop_length: 512,
            rolloff_percent: 0.85,
        }
    }

    /// Length of the vectors produced with this configuration
    pub fn feature_count(&self) -> usize {
        2 * self.n_mfcc + 3
    }
}

/// Fixed-length acoustic feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
    n_mfcc: usize,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>, n_mfcc: usize) -> Self {
        Self { values, n_mfcc }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mfcc_means(&self) -> &[f64] {
        &self.values[..self.n_mfcc]
    }

    pub fn mfcc_stds(&self) -> &[f64] {
        &self.values[self.n_mfcc..2 * self.n_mfcc]
    }

    pub fn spectral_centroid(&self) -> f64 {
        self.values[2 * self.n_mfcc]
    }

    pub fn spectral_rolloff(&self) -> f64 {
        self.values[2 * self.n_mfcc + 1]
    }

    pub fn zero_crossing_rate(&self) -> f64 {
        self.values[2 * self.n_mfcc + 2]
    }
}

/// Extract the feature vector from mono samples at `config.sample_rate`
pub fn extract_features(samples: &[f32], config: &FeatureConfig) -> Result<FeatureVector> {
    anyhow::ensure!(!samples.is_empty(), "Audio file is empty or could not be loaded");
    anyhow::ensure!(
        config.n_mfcc > 0 && config.n_mfcc <= config.n_mels,
        "n_mfcc must be within 1..={}",
        config.n_mels
    );

    let spectrogram = stft::stft_magnitude(samples, config.sample_rate, config.n_fft, config.hop_length);
    let coefficients = mfcc::mfcc(&spectrogram, config.n_mels, config.n_mfcc);
    let centroid = spectral::spectral_centroid(&spectrogram);
    let rolloff = spectral::spectral_rolloff(&spectrogram, config.rolloff_percent);
    let zcr = spectral::zero_crossing_rate(samples, config.n_fft, config.hop_length);

    let mut values = Vec::with_capacity(config.feature_count());
    let (means, stds) = column_stats(&coefficients, config.n_mfcc);
    values.extend(means);
    values.extend(stds);
    values.push(mean(&centroid));
    values.push(mean(&rolloff));
    values.push(mean(&zcr));

    anyhow::ensure!(
        values.iter().all(|v| v.is_finite()),
        "Feature extraction produced non-finite values"
    );

    tracing::debug!(
        frames = spectrogram.n_frames(),
        features = values.len(),
        "Extracted acoustic features"
    );

    Ok(FeatureVector::new(values, config.n_mfcc))
}

/// Decode, resample and analyse an audio file
pub fn analyze_file(path: &Path, config: &FeatureConfig) -> Result<FeatureVector> {
    let decoded = decode_audio_file(path, config.max_duration_secs)?;
    tracing::debug!(
        channels = decoded.channels,
        source_rate = decoded.sample_rate,
        duration_seconds = decoded.duration_seconds,
        "Analysing clip"
    );
    let samples = resample_mono(decoded.samples, decoded.sample_rate, config.sample_rate)
        .context("Failed to resample audio")?;
    extract_features(&samples, config)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Per-column mean and population standard deviation
fn column_stats(rows: &[Vec<f64>], columns: usize) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len().max(1) as f64;
    let mut means = vec![0.0; columns];
    for row in rows {
        for (acc, v) in means.iter_mut().zip(row) {
            *acc += v;
        }
    }
    means.iter_mut().for_each(|m| *m /= n);

    let mut stds = vec![0.0; columns];
    for row in rows {
        for ((acc, v), m) in stds.iter_mut().zip(row).zip(&means) {
            *acc += (v - m).powi(2);
        }
    }
    stds.iter_mut().for_each(|s| *s = (*s / n).sqrt());

    (means, stds)
}
