//! Short-time Fourier transform over overlapping Tukey-windowed segments.

use log::{debug, warn};
use ndarray::Array2;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::FftPlanner;

use crate::config::SpectrogramConfig;
use crate::error::ComputationError;
use crate::loader::AudioSignal;
use crate::spectrum::bin_frequencies;
use crate::window::{power_sum, tukey};

/// Power spectral density per (frequency, time) cell.
#[derive(Debug, Clone)]
pub struct SpectrogramResult {
    frequencies: Vec<f32>,
    times: Vec<f32>,
    power: Array2<f32>,
}

impl SpectrogramResult {
    /// Bin frequencies in Hz, one per row of [`power`](Self::power).
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Segment centres in seconds, one per column of [`power`](Self::power).
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn power(&self) -> &Array2<f32> {
        &self.power
    }

    /// Strongest non-DC frequency of every frame.
    pub fn ridge(&self) -> Vec<f32> {
        self.power
            .columns()
            .into_iter()
            .map(|frame| {
                frame
                    .iter()
                    .enumerate()
                    .skip(1)
                    .max_by(|(_, a), (_, b)| a.total_cmp(b))
                    .map(|(k, _)| self.frequencies[k])
                    .unwrap_or(0.0)
            })
            .collect()
    }
}

pub fn spectrogram(signal: &AudioSignal) -> Result<SpectrogramResult, ComputationError> {
    spectrogram_with(signal, &SpectrogramConfig::default())
}

/// Splits `signal` into segments of `config.nperseg` samples advancing by
/// `nperseg - overlap`, removes each segment's mean, applies a periodic
/// Tukey window and returns the one-sided power spectral density.
///
/// Trailing samples that do not fill a whole segment are dropped.
pub fn spectrogram_with(
    signal: &AudioSignal,
    config: &SpectrogramConfig,
) -> Result<SpectrogramResult, ComputationError> {
    if signal.is_empty() {
        return Err(ComputationError::EmptySignal);
    }
    if config.nperseg == 0 || config.overlap >= config.nperseg {
        return Err(ComputationError::InvalidSegment {
            nperseg: config.nperseg,
            overlap: config.overlap,
        });
    }

    let samples = signal.samples();
    let fs = signal.sample_rate() as f32;

    let (nperseg, overlap) = if config.nperseg > samples.len() {
        warn!(
            "segment length {} exceeds signal length {}, using {}",
            config.nperseg,
            samples.len(),
            samples.len()
        );
        let nperseg = samples.len();
        let overlap = (config.overlap * nperseg / config.nperseg).min(nperseg - 1);
        (nperseg, overlap)
    } else {
        (config.nperseg, config.overlap)
    };
    let hop = nperseg - overlap;

    let window = tukey(nperseg, config.alpha, true)?;
    let scale = 1.0 / (fs * power_sum(&window));

    let num_bins = nperseg / 2 + 1;
    let num_frames = (samples.len() - nperseg) / hop + 1;
    debug!(
        "stft: nperseg {}, hop {}, {} frames x {} bins",
        nperseg, hop, num_frames, num_bins
    );

    let fft = FftPlanner::<f32>::new().plan_fft_forward(nperseg);
    let mut buffer = vec![Complex::zero(); nperseg];
    let mut power = Array2::<f32>::zeros((num_bins, num_frames));

    for (t, mut column) in power.columns_mut().into_iter().enumerate() {
        let segment = &samples[t * hop..t * hop + nperseg];
        let mean = segment.iter().sum::<f32>() / nperseg as f32;
        for ((slot, &s), &w) in buffer.iter_mut().zip(segment).zip(&window) {
            *slot = Complex::new((s - mean) * w, 0.0);
        }
        fft.process(&mut buffer);

        for (k, cell) in column.iter_mut().enumerate() {
            let mut psd = buffer[k].norm_sqr() * scale;
            let nyquist = nperseg % 2 == 0 && k == nperseg / 2;
            if k != 0 && !nyquist {
                psd *= 2.0;
            }
            *cell = psd;
        }
    }

    let frequencies = bin_frequencies(signal.sample_rate(), nperseg, num_bins);
    let times = (0..num_frames)
        .map(|t| (t * hop) as f32 / fs + nperseg as f32 / 2.0 / fs)
        .collect();

    Ok(SpectrogramResult {
        frequencies,
        times,
        power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::transform;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> AudioSignal {
        let samples = (0..len)
            .map(|n| (2.0 * PI * freq * n as f32 / sample_rate as f32).sin())
            .collect();
        AudioSignal::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn axes_match_matrix_shape() {
        let result = spectrogram(&sine(440.0, 22050, 22050)).unwrap();
        assert_eq!(result.frequencies().len(), result.power().nrows());
        assert_eq!(result.times().len(), result.power().ncols());
        assert_eq!(result.frequencies().len(), 129);
        // (22050 - 256) / 128 + 1
        assert_eq!(result.times().len(), 171);
    }

    #[test]
    fn times_are_segment_centres() {
        let result = spectrogram(&sine(100.0, 1000, 1000)).unwrap();
        let times = result.times();
        assert!((times[0] - 0.128).abs() < 1e-6);
        assert!((times[1] - times[0] - 0.128).abs() < 1e-6);
    }

    #[test]
    fn resolution_matches_full_transform_of_one_segment() {
        let seg = sine(1000.0, 8000, 256);
        let spec = transform(&seg).unwrap();
        let stft = spectrogram(&seg).unwrap();
        assert_eq!(stft.times().len(), 1);
        assert_eq!(
            &stft.frequencies()[..spec.frequencies().len()],
            spec.frequencies()
        );
    }

    #[test]
    fn constant_signal_is_removed_by_detrend() {
        let signal = AudioSignal::new(vec![0.7; 2048], 8000).unwrap();
        let result = spectrogram(&signal).unwrap();
        assert!(result.power().iter().all(|&p| p.abs() < 1e-8));
    }

    #[test]
    fn ridge_follows_a_steady_tone() {
        let result = spectrogram(&sine(1000.0, 8000, 8000)).unwrap();
        let width = 8000.0 / 256.0;
        for f in result.ridge() {
            assert!((f - 1000.0).abs() <= width, "ridge at {f}");
        }
    }

    #[test]
    fn short_signal_uses_a_single_segment() {
        let result = spectrogram(&sine(100.0, 1000, 100)).unwrap();
        assert_eq!(result.times().len(), 1);
        assert_eq!(result.frequencies().len(), 51);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let signal = sine(100.0, 1000, 1000);
        let config = SpectrogramConfig {
            nperseg: 64,
            overlap: 64,
            ..Default::default()
        };
        assert_eq!(
            spectrogram_with(&signal, &config).unwrap_err(),
            ComputationError::InvalidSegment {
                nperseg: 64,
                overlap: 64
            }
        );

        let config = SpectrogramConfig {
            alpha: -0.5,
            ..Default::default()
        };
        assert_eq!(
            spectrogram_with(&signal, &config).unwrap_err(),
            ComputationError::InvalidWindow(-0.5)
        );

        let empty = AudioSignal::new(Vec::new(), 1000).unwrap();
        assert_eq!(spectrogram(&empty).unwrap_err(), ComputationError::EmptySignal);
    }
}
