//! Mel-frequency cepstral coefficients

use super::mel::{apply_filterbank, mel_filterbank};
use super::stft::Spectrogram;

const AMIN: f64 = 1e-10;
const TOP_DB: f64 = 80.0;

/// Compute MFCCs, one `n_mfcc` vector per frame
///
/// mel power spectrogram → dB (ref 1.0, floor `max - 80 dB`) → orthonormal
/// DCT-II over the mel axis, keeping the first `n_mfcc` coefficients.
pub fn mfcc(spectrogram: &Spectrogram, n_mels: usize, n_mfcc: usize) -> Vec<Vec<f64>> {
    let nyquist = spectrogram.sample_rate as f64 / 2.0;
    let filterbank = mel_filterbank(spectrogram.sample_rate, spectrogram.n_fft, n_mels, 0.0, nyquist);

    let mel_power: Vec<Vec<f64>> = spectrogram
        .power()
        .iter()
        .map(|frame| apply_filterbank(&filterbank, frame))
        .collect();

    let mel_db = power_to_db(&mel_power);
    let basis = dct_basis(n_mels, n_mfcc);

    mel_db
        .iter()
        .map(|frame| {
            basis
                .iter()
                .map(|row| row.iter().zip(frame).map(|(b, x)| b * x).sum())
                .collect()
        })
        .collect()
}

/// Convert power values to decibels, clamped to `TOP_DB` below the global peak
pub fn power_to_db(power: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut db: Vec<Vec<f64>> = power
        .iter()
        .map(|frame| frame.iter().map(|&p| 10.0 * p.max(AMIN).log10()).collect())
        .collect();

    let peak = db
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let floor = peak - TOP_DB;

    for value in db.iter_mut().flatten() {
        *value = value.max(floor);
    }
    db
}

/// Orthonormal DCT-II basis, `n_out × n_in`
fn dct_basis(n_in: usize, n_out: usize) -> Vec<Vec<f64>> {
    let n = n_in as f64;
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_in)
                .map(|i| {
                    scale * (std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos()
                })
                .collect()
        })
        .collect()
}
