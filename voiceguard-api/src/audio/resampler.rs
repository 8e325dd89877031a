//! Sample rate conversion with rubato

use anyhow::{Context, Result};
use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};

/// Resample mono PCM from `source_rate` to `target_rate`
///
/// Returns the input unchanged when the rates already match. The output is
/// aligned with the input (filter delay removed) and holds
/// `ceil(len * target_rate / source_rate)` samples.
///
/// # Algorithm
/// - Sinc interpolation with BlackmanHarris2 window
/// - 256-tap filter, 0.95 cutoff to prevent aliasing
/// - Chunk size equals input length (clips are capped at a few seconds), then
///   the filter tail is flushed with `process_partial`
pub fn resample_mono(samples: Vec<f32>, source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples);
    }
    anyhow::ensure!(source_rate > 0 && target_rate > 0, "Sample rate must be non-zero");

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let num_frames = samples.len();
    let expected_frames = (num_frames as f64 * ratio).ceil() as usize;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, num_frames, 1)
        .context("Failed to create rubato resampler")?;
    let delay = resampler.output_delay();

    let mut resampled = resampler
        .process(&[samples], None)
        .context("Rubato resampling failed")?
        .pop()
        .unwrap_or_default();

    // Short clips may need several flushes to cover the delay
    while resampled.len() < delay + expected_frames {
        let tail = resampler
            .process_partial::<Vec<f32>>(None, None)
            .context("Rubato flush failed")?
            .pop()
            .unwrap_or_default();
        if tail.is_empty() {
            break;
        }
        resampled.extend(tail);
    }

    resampled.drain(..delay.min(resampled.len()));
    resampled.truncate(expected_frames);

    tracing::debug!(
        input_frames = num_frames,
        output_frames = resampled.len(),
        delay_frames = delay,
        source_rate = source_rate,
        target_rate = target_rate,
        "Resampled audio"
    );

    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: u32, seconds: f32) -> Vec<f32> {
        let n = (rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_same_rate_is_identity() {
        let input = sine(440.0, 16_000, 0.1);
        let output = resample_mono(input.clone(), 16_000, 16_000).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample_mono(Vec::new(), 44_100, 16_000).unwrap().is_empty());
    }

    #[test]
    fn test_downsample_length() {
        let input = sine(440.0, 48_000, 1.0);
        let output = resample_mono(input, 48_000, 16_000).unwrap();
        assert_eq!(output.len(), 16_000);
    }

    #[test]
    fn test_upsample_length() {
        let input = sine(440.0, 8_000, 0.5);
        let output = resample_mono(input, 8_000, 16_000).unwrap();
        assert_eq!(output.len(), 8_000);
    }

    #[test]
    fn test_output_aligned_with_input() {
        // Single click at 0.1 s
        let mut input = vec![0.0f32; 48_000];
        input[4_800] = 1.0;

        let output = resample_mono(input, 48_000, 16_000).unwrap();
        let peak = output
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, _)| i)
            .unwrap();

        assert!((peak as i64 - 1_600).abs() <= 2, "peak at {}", peak);
    }

    #[test]
    fn test_short_clip_keeps_expected_length() {
        let input = sine(440.0, 44_100, 0.01);
        let expected = (input.len() as f64 * 16_000.0 / 44_100.0).ceil() as usize;
        let output = resample_mono(input, 44_100, 16_000).unwrap();
        assert_eq!(output.len(), expected);
    }

    #[test]
    fn test_output_stays_bounded() {
        let input = sine(1000.0, 44_100, 0.5);
        let output = resample_mono(input, 44_100, 16_000).unwrap();
        assert!(output.iter().all(|s| s.is_finite() && s.abs() < 1.0));
    }
}
