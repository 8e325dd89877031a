//! Audio Decoding Utilities
//!
//! Decode audio files to mono f32 PCM samples using symphonia for
//! format-agnostic decoding (MP3, FLAC, AAC, WAV, OGG, ...).

use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded audio result
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Original channel count
    pub channels: usize,
    /// Duration of the decoded samples in seconds
    pub duration_seconds: f64,
}

/// Decode at most `max_duration_secs` of an audio file to mono f32 PCM
///
/// **Algorithm:**
/// 1. Probe format (file extension as hint)
/// 2. Pick the first track with a known codec
/// 3. Decode packets, skipping corrupt frames
/// 4. Average channels to mono
/// 5. Stop once `max_duration_secs` worth of samples is collected
///
/// # Errors
/// * File I/O errors
/// * Unsupported format
/// * No decodable samples ("Audio file is empty or could not be loaded")
pub fn decode_audio_file(file_path: &Path, max_duration_secs: f64) -> Result<DecodedAudio> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open audio file: {}", file_path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found in file")?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params.sample_rate.context("Sample rate unknown")?;
    let channel_count = codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let max_samples = (max_duration_secs * sample_rate as f64).ceil() as usize;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    let mut samples: Vec<f32> = Vec::with_capacity(max_samples.min(1 << 22));

    while samples.len() < max_samples {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(anyhow::anyhow!("Error reading packet: {}", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => return Err(anyhow::anyhow!("Failed to decode packet: {}", e)),
        };

        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let remaining = max_samples - samples.len();
        downmix_into(sample_buf.samples(), spec.channels.count(), remaining, &mut samples);
    }

    if samples.is_empty() {
        anyhow::bail!("Audio file is empty or could not be loaded");
    }

    let duration_seconds = samples.len() as f64 / sample_rate as f64;

    tracing::debug!(
        path = %file_path.display(),
        sample_rate = sample_rate,
        channels = channel_count,
        total_samples = samples.len(),
        duration_seconds = format!("{:.2}", duration_seconds),
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels: channel_count,
        duration_seconds,
    })
}

/// Average interleaved frames to mono, appending at most `limit` samples
fn downmix_into(interleaved: &[f32], channels: usize, limit: usize, out: &mut Vec<f32>) {
    let channels = channels.max(1);
    if channels == 1 {
        let take = interleaved.len().min(limit);
        out.extend_from_slice(&interleaved[..take]);
        return;
    }

    out.extend(
        interleaved
            .chunks_exact(channels)
            .take(limit)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}
