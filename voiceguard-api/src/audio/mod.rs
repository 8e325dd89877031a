//! Audio ingestion and decoding
//!
//! Clips arrive as base64 in the request body or as a URL. Either way they are
//! written to a [`TempAudioFile`] under the configured temp directory, decoded
//! with symphonia and resampled with rubato.

pub mod base64_decoder;
pub mod decoder;
pub mod downloader;
pub mod resampler;

pub use base64_decoder::save_base64_audio;
pub use decoder::{decode_audio_file, DecodedAudio};
pub use downloader::download_audio;
pub use resampler::resample_mono;

use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

/// Format assumed when the request does not name one
pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";

const MAX_FORMAT_LEN: usize = 10;

/// Audio ingestion failures
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported audio_format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid base64 audio: {0}")]
    InvalidBase64(String),

    #[error("Invalid audio_url: {0}")]
    InvalidUrl(String),

    #[error("Failed to download audio: {0}")]
    Download(String),

    #[error("Error processing audio file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedFormat(_) | IngestError::InvalidUrl(_) => {
                ApiError::BadRequest(err.to_string())
            }
            IngestError::InvalidBase64(_) | IngestError::Download(_) | IngestError::Io(_) => {
                ApiError::Processing(err.to_string())
            }
        }
    }
}

/// Normalize a client-supplied audio format into a safe file extension
///
/// Empty means [`DEFAULT_AUDIO_FORMAT`]. Anything but 1-10 ASCII
/// alphanumerics is rejected, since the value becomes part of a path.
pub fn normalize_format(audio_format: &str) -> Result<String, IngestError> {
    let trimmed = audio_format.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return Ok(DEFAULT_AUDIO_FORMAT.to_string());
    }

    if trimmed.len() > MAX_FORMAT_LEN || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(IngestError::UnsupportedFormat(audio_format.to_string()));
    }

    Ok(trimmed.to_ascii_lowercase())
}

/// Audio clip on disk, removed when dropped
///
/// The file is deleted whether processing succeeds or fails.
#[derive(Debug)]
pub struct TempAudioFile {
    path: PathBuf,
}

impl TempAudioFile {
    /// Reserve a unique `<uuid>.<extension>` path inside `dir`
    ///
    /// Creates `dir` if missing. The file itself is not created.
    pub fn reserve(dir: &Path, extension: &str) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.{}", Uuid::new_v4(), extension));
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temp audio file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temp audio file"
            ),
        }
    }
}
