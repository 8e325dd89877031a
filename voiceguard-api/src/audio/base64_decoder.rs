//! Base64 audio ingestion

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use std::path::Path;

use super::{IngestError, TempAudioFile};

/// Standard alphabet, padding optional
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64 audio into `<temp_dir>/<uuid>.<audio_format>`
///
/// Accepts a `data:<mime>;base64,` prefix and ignores embedded whitespace
/// (line-wrapped payloads). `audio_format` must already be normalized
/// (see [`super::normalize_format`]).
///
/// # Errors
/// * `InvalidBase64` - payload is not base64 or decodes to nothing
/// * `Io` - temp directory or file could not be written
pub fn save_base64_audio(
    temp_dir: &Path,
    audio_base64: &str,
    audio_format: &str,
) -> Result<TempAudioFile, IngestError> {
    let audio_bytes = decode_payload(audio_base64)?;

    let file = TempAudioFile::reserve(temp_dir, audio_format)?;
    std::fs::write(file.path(), &audio_bytes)?;

    tracing::debug!(
        path = %file.path().display(),
        bytes = audio_bytes.len(),
        "Saved base64 audio"
    );

    Ok(file)
}

/// Decode a base64 payload, tolerating data-URL prefixes and whitespace
pub fn decode_payload(audio_base64: &str) -> Result<Vec<u8>, IngestError> {
    let payload = strip_data_url(audio_base64.trim());
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| IngestError::InvalidBase64(e.to_string()))?;

    if bytes.is_empty() {
        return Err(IngestError::InvalidBase64("decoded audio is empty".to_string()));
    }

    Ok(bytes)
}

fn strip_data_url(payload: &str) -> &str {
    if payload.starts_with("data:") {
        if let Some((_, data)) = payload.split_once(',') {
            return data;
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_decode_plain() {
        let encoded = STANDARD.encode(b"RIFF audio");
        assert_eq!(decode_payload(&encoded).unwrap(), b"RIFF audio");
    }

    #[test]
    fn test_decode_without_padding() {
        // "ab" encodes to "YWI=" with padding
        assert_eq!(decode_payload("YWI").unwrap(), b"ab");
        assert_eq!(decode_payload("YWI=").unwrap(), b"ab");
    }

    #[test]
    fn test_decode_data_url_and_whitespace() {
        let encoded = STANDARD.encode(b"some longer audio payload");
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("data:audio/mpeg;base64,{}\n  {}\r\n", head, tail);
        assert_eq!(decode_payload(&wrapped).unwrap(), b"some longer audio payload");
    }

    #[test]
    fn test_decode_invalid() {
        let err = decode_payload("not*base64!").unwrap_err();
        assert!(err.to_string().starts_with("Invalid base64 audio:"));
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(matches!(
            decode_payload("data:audio/mpeg;base64,"),
            Err(IngestError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_save_writes_file_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let encoded = STANDARD.encode(b"ID3 fake mp3");

        let file = save_base64_audio(dir.path(), &encoded, "mp3").unwrap();
        assert_eq!(file.path().parent().unwrap(), dir.path());
        assert_eq!(file.path().extension().unwrap(), "mp3");
        assert_eq!(std::fs::read(file.path()).unwrap(), b"ID3 fake mp3");

        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_save_invalid_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_base64_audio(dir.path(), "%%%", "mp3").is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
