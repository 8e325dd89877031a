//! Remote audio download
//!
//! Streams an audio URL to a temp file, chunk by chunk, enforcing a size cap.

use std::path::Path;
use tokio::io::AsyncWriteExt;

use super::{normalize_format, IngestError, TempAudioFile, DEFAULT_AUDIO_FORMAT};

/// Browser-like User-Agent; some audio hosts reject unknown clients
pub const DOWNLOAD_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Download `audio_url` into `<temp_dir>/<uuid>.<ext>`
///
/// The extension comes from the URL path when it is a plausible audio format,
/// otherwise `mp3`. The request timeout is configured on `client`.
///
/// # Errors
/// * `InvalidUrl` - not an http(s) URL
/// * `Download` - connection failure, non-2xx status, or body over `max_bytes`
/// * `Io` - temp file could not be written
pub async fn download_audio(
    client: &reqwest::Client,
    audio_url: &str,
    temp_dir: &Path,
    max_bytes: u64,
) -> Result<TempAudioFile, IngestError> {
    let url = reqwest::Url::parse(audio_url.trim())
        .map_err(|e| IngestError::InvalidUrl(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(IngestError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    tracing::debug!(url = %url, "Downloading audio");

    let mut response = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| IngestError::Download(e.to_string()))?;

    if let Some(length) = response.content_length() {
        if length > max_bytes {
            return Err(IngestError::Download(format!(
                "audio is {} bytes, limit is {}",
                length, max_bytes
            )));
        }
    }

    let file = TempAudioFile::reserve(temp_dir, &extension_for(&url))?;
    let mut out = tokio::fs::File::create(file.path()).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| IngestError::Download(e.to_string()))?
    {
        written += chunk.len() as u64;
        if written > max_bytes {
            return Err(IngestError::Download(format!(
                "audio exceeds {} byte limit",
                max_bytes
            )));
        }
        out.write_all(&chunk).await?;
    }
    out.flush().await?;

    if written == 0 {
        return Err(IngestError::Download("empty response body".to_string()));
    }

    tracing::debug!(
        path = %file.path().display(),
        bytes = written,
        "Downloaded audio"
    );

    Ok(file)
}

fn extension_for(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .and_then(|(_, ext)| normalize_format(ext).ok())
        .unwrap_or_else(|| DEFAULT_AUDIO_FORMAT.to_string())
}
