//! Short-time Fourier transform
//!
//! Frames are centered: the signal is zero-padded by `n_fft / 2` on both
//! sides, so frame `t` is centered on sample `t * hop_length` and there are
//! `1 + len / hop_length` frames.

use rustfft::{num_complex::Complex, FftPlanner};

/// Magnitude spectrogram, `frames × (n_fft / 2 + 1)` bins
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub magnitudes: Vec<Vec<f64>>,
    pub n_fft: usize,
    pub sample_rate: u32,
}

impl Spectrogram {
    pub fn n_frames(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Squared magnitudes
    pub fn power(&self) -> Vec<Vec<f64>> {
        self.magnitudes
            .iter()
            .map(|frame| frame.iter().map(|m| m * m).collect())
            .collect()
    }

    /// Center frequency (Hz) of each bin
    pub fn bin_frequencies(&self) -> Vec<f64> {
        fft_frequencies(self.sample_rate, self.n_fft)
    }
}

/// Center frequencies of the `n_fft / 2 + 1` real-FFT bins
pub fn fft_frequencies(sample_rate: u32, n_fft: usize) -> Vec<f64> {
    let n_bins = n_fft / 2 + 1;
    let step = sample_rate as f64 / n_fft as f64;
    (0..n_bins).map(|k| k as f64 * step).collect()
}

/// Periodic Hann window
pub fn hann_window(size: usize) -> Vec<f64> {
    let factor = 2.0 * std::f64::consts::PI / size as f64;
    (0..size).map(|i| 0.5 - 0.5 * (i as f64 * factor).cos()).collect()
}

/// Centered, zero-padded STFT magnitude spectrogram
pub fn stft_magnitude(samples: &[f32], sample_rate: u32, n_fft: usize, hop_length: usize) -> Spectrogram {
    let pad = n_fft / 2;
    let mut padded = vec![0.0f64; samples.len() + 2 * pad];
    for (dst, &src) in padded[pad..pad + samples.len()].iter_mut().zip(samples) {
        *dst = src as f64;
    }

    let n_frames = 1 + (padded.len() - n_fft) / hop_length;
    let n_bins = n_fft / 2 + 1;
    let window = hann_window(n_fft);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut buffer = vec![Complex::new(0.0, 0.0); n_fft];

    let mut magnitudes = Vec::with_capacity(n_frames);
    for frame_idx in 0..n_frames {
        let start = frame_idx * hop_length;
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = Complex::new(padded[start + i] * window[i], 0.0);
        }

        fft.process(&mut buffer);

        magnitudes.push(buffer[..n_bins].iter().map(|c| c.norm()).collect());
    }

    Spectrogram {
        magnitudes,
        n_fft,
        sample_rate,
    }
}
