//! Mel scale and triangular mel filterbank (Slaney variant)
//!
//! Linear below 1 kHz, logarithmic above; each filter is area-normalized.

use super::stft::fft_frequencies;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        mel * F_SP
    }
}

/// Build an `n_mels × (n_fft / 2 + 1)` filterbank covering `fmin..=fmax` Hz
pub fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize, fmin: f64, fmax: f64) -> Vec<Vec<f64>> {
    let fft_freqs = fft_frequencies(sample_rate, n_fft);

    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);
    let points = n_mels + 2;
    let mel_points: Vec<f64> = (0..points)
        .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (points - 1) as f64))
        .collect();

    (0..n_mels)
        .map(|m| {
            let (left, center, right) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
            let norm = 2.0 / (right - left);

            fft_freqs
                .iter()
                .map(|&f| {
                    let lower = (f - left) / (center - left);
                    let upper = (right - f) / (right - center);
                    lower.min(upper).max(0.0) * norm
                })
                .collect()
        })
        .collect()
}

/// Apply a filterbank to one power-spectrum frame
pub fn apply_filterbank(filterbank: &[Vec<f64>], frame: &[f64]) -> Vec<f64> {
    filterbank
        .iter()
        .map(|filter| filter.iter().zip(frame).map(|(w, p)| w * p).sum())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_linear_region() {
        assert!((hz_to_mel(200.0) - 3.0).abs() < 1e-9);
        assert!((mel_to_hz(3.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_mel_scale_breakpoint() {
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
        assert!((mel_to_hz(15.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_mel_scale_inverse() {
        for hz in [0.0, 440.0, 999.0, 1000.0, 4000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6, "hz={}", hz);
        }
    }

    #[test]
    fn test_filterbank_shape_and_non_negative() {
        let fb = mel_filterbank(16_000, 2048, 128, 0.0, 8000.0);
        assert_eq!(fb.len(), 128);
        assert!(fb.iter().all(|row| row.len() == 1025));
        assert!(fb.iter().flatten().all(|&w| w >= 0.0));
    }

    #[test]
    fn test_filters_are_not_empty() {
        let fb = mel_filterbank(16_000, 2048, 128, 0.0, 8000.0);
        for (i, row) in fb.iter().enumerate() {
            assert!(row.iter().any(|&w| w > 0.0), "filter {} is empty", i);
        }
    }

    #[test]
    fn test_apply_filterbank() {
        let fb = vec![vec![1.0, 0.0, 0.5], vec![0.0, 2.0, 0.0]];
        assert_eq!(apply_filterbank(&fb, &[2.0, 3.0, 4.0]), vec![4.0, 6.0]);
    }
}
