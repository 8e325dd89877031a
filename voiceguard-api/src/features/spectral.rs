//! Per-frame spectral descriptors and zero-crossing rate

use super::stft::Spectrogram;

/// Amplitudes at or below this count as zero for zero-crossing detection
const ZERO_THRESHOLD: f32 = 1e-10;

/// Spectral centroid (Hz) of each frame; silent frames yield 0
pub fn spectral_centroid(spectrogram: &Spectrogram) -> Vec<f64> {
    let freqs = spectrogram.bin_frequencies();

    spectrogram
        .magnitudes
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().sum();
            if total <= f64::MIN_POSITIVE {
                return 0.0;
            }
            frame.iter().zip(&freqs).map(|(m, f)| m * f).sum::<f64>() / total
        })
        .collect()
}

/// Frequency (Hz) below which `roll_percent` of each frame's energy lies
pub fn spectral_rolloff(spectrogram: &Spectrogram, roll_percent: f64) -> Vec<f64> {
    let freqs = spectrogram.bin_frequencies();

    spectrogram
        .magnitudes
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().sum();
            let threshold = roll_percent * total;

            let mut cumulative = 0.0;
            for (magnitude, freq) in frame.iter().zip(&freqs) {
                cumulative += magnitude;
                if cumulative >= threshold {
                    return *freq;
                }
            }
            freqs.last().copied().unwrap_or(0.0)
        })
        .collect()
}

/// Zero-crossing rate per frame
///
/// Frames are centered (edge-padded by `frame_length / 2`). The rate is the
/// number of sign changes inside the frame divided by `frame_length`; values
/// within `ZERO_THRESHOLD` of zero count as positive.
pub fn zero_crossing_rate(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let pad = frame_length / 2;
    let first = samples[0];
    let last = samples[samples.len() - 1];

    let padded: Vec<bool> = std::iter::repeat(first)
        .take(pad)
        .chain(samples.iter().copied())
        .chain(std::iter::repeat(last).take(pad))
        .map(|s| s.abs() > ZERO_THRESHOLD && s < 0.0)
        .collect();

    let n_frames = 1 + padded.len().saturating_sub(frame_length) / hop_length;

    (0..n_frames)
        .map(|t| {
            let start = t * hop_length;
            let end = (start + frame_length).min(padded.len());
            let frame = &padded[start..end];
            let crossings = frame.windows(2).filter(|w| w[0] != w[1]).count();
            crossings as f64 / frame_length as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::stft::stft_magnitude;

    fn sine(freq: f32, rate: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_centroid_tracks_tone() {
        let spec = stft_magnitude(&sine(2000.0, 16_000, 16_000), 16_000, 2048, 512);
        let centroids = spectral_centroid(&spec);
        let mid = centroids[centroids.len() / 2];
        assert!((mid - 2000.0).abs() < 150.0, "centroid {}", mid);
    }

    #[test]
    fn test_centroid_of_silence_is_zero() {
        let spec = stft_magnitude(&vec![0.0; 4096], 16_000, 2048, 512);
        assert!(spectral_centroid(&spec).iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_rolloff_above_tone() {
        let spec = stft_magnitude(&sine(1000.0, 16_000, 16_000), 16_000, 2048, 512);
        let rolloff = spectral_rolloff(&spec, 0.85);
        let mid = rolloff[rolloff.len() / 2];
        assert!(mid >= 990.0 && mid < 1300.0, "rolloff {}", mid);
    }

    #[test]
    fn test_rolloff_of_silence_is_zero() {
        let spec = stft_magnitude(&vec![0.0; 4096], 16_000, 2048, 512);
        assert!(spectral_rolloff(&spec, 0.85).iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_zcr_of_alternating_signal() {
        let samples: Vec<f32> = (0..8192).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let zcr = zero_crossing_rate(&samples, 2048, 512);
        let mid = zcr[zcr.len() / 2];
        // 2047 sign changes in a 2048-sample frame
        assert!((mid - 2047.0 / 2048.0).abs() < 1e-9);
    }

    #[test]
    fn test_zcr_of_sine() {
        // 100 Hz at 16 kHz: 200 crossings per second, 0.0125 per sample
        let zcr = zero_crossing_rate(&sine(100.0, 16_000, 16_000), 2048, 512);
        let mid = zcr[zcr.len() / 2];
        assert!((mid - 0.0125).abs() < 0.002, "zcr {}", mid);
    }

    #[test]
    fn test_zcr_frame_count_matches_stft() {
        let samples = sine(440.0, 16_000, 10_000);
        let zcr = zero_crossing_rate(&samples, 2048, 512);
        let spec = stft_magnitude(&samples, 16_000, 2048, 512);
        assert_eq!(zcr.len(), spec.n_frames());
    }

    #[test]
    fn test_zcr_empty() {
        assert!(zero_crossing_rate(&[], 2048, 512).is_empty());
    }
}
