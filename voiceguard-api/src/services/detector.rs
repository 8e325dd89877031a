//! Voice detection pipeline
//!
//! ingest (base64 or URL) → decode → resample → features → classify
//!
//! Ingestion and analysis run on the blocking pool. The temp file is owned by
//! the pipeline and removed when it goes out of scope, on success or failure.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use voiceguard_common::config::ServiceConfig;

use crate::audio::downloader::DOWNLOAD_USER_AGENT;
use crate::audio::{download_audio, normalize_format, save_base64_audio, TempAudioFile};
use crate::classifier::{Classifier, Prediction};
use crate::error::{ApiError, ApiResult};
use crate::features::{analyze_file, FeatureConfig};

/// Where a clip comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Base64 payload from the request body
    Base64(String),
    /// Remote URL to download
    Url(String),
}

/// Runs clips through feature extraction and the loaded classifier
pub struct DetectionService {
    classifier: Arc<dyn Classifier>,
    features: FeatureConfig,
    temp_dir: PathBuf,
    http_client: reqwest::Client,
    max_download_bytes: u64,
}

impl DetectionService {
    pub fn new(config: &ServiceConfig, classifier: Arc<dyn Classifier>) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(DOWNLOAD_USER_AGENT)
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .build()?;

        Ok(Self {
            classifier,
            features: FeatureConfig::from_settings(&config.features),
            temp_dir: config.temp_dir.clone(),
            http_client,
            max_download_bytes: config.max_download_bytes,
        })
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Classify a clip
    ///
    /// # Errors
    /// * `BadRequest` - unusable `audio_format` or `audio_url`
    /// * `Processing` - bad base64, failed download, undecodable audio
    ///   (`Error preprocessing audio: ...`) or classifier failure
    ///   (`Error during prediction: ...`)
    pub async fn detect(&self, source: AudioSource, audio_format: &str) -> ApiResult<Prediction> {
        let file = self.ingest(source, audio_format).await?;

        let classifier = Arc::clone(&self.classifier);
        let config = self.features.clone();

        let prediction = tokio::task::spawn_blocking(move || -> ApiResult<Prediction> {
            let features = analyze_file(file.path(), &config)
                .map_err(|e| ApiError::Processing(format!("Error preprocessing audio: {:#}", e)))?;

            classifier
                .predict(&features)
                .map_err(|e| ApiError::Processing(format!("Error during prediction: {}", e)))
        })
        .await
        .map_err(|e| ApiError::Processing(format!("Error preprocessing audio: {}", e)))??;

        tracing::info!(
            prediction = %prediction.label,
            confidence = prediction.confidence,
            classifier = self.classifier.name(),
            "Classified audio"
        );

        Ok(prediction)
    }

    /// Check that a clip can be ingested, then discard it
    pub async fn validate_audio(&self, source: AudioSource, audio_format: &str) -> ApiResult<()> {
        let file = self.ingest(source, audio_format).await?;
        tracing::debug!(path = %file.path().display(), "Audio accepted");
        Ok(())
    }

    async fn ingest(&self, source: AudioSource, audio_format: &str) -> ApiResult<TempAudioFile> {
        let format = normalize_format(audio_format)?;

        let file = match source {
            AudioSource::Base64(payload) => {
                let temp_dir = self.temp_dir.clone();
                tokio::task::spawn_blocking(move || save_base64_audio(&temp_dir, &payload, &format))
                    .await
                    .map_err(|e| ApiError::Processing(format!("Error saving audio: {}", e)))??
            }
            AudioSource::Url(url) => {
                download_audio(&self.http_client, &url, &self.temp_dir, self.max_download_bytes)
                    .await?
            }
        };

        Ok(file)
    }
}
