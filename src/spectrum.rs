//! Fourier transform of a whole recording.

use log::debug;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::config::FrequencyAxis;
use crate::error::ComputationError;
use crate::loader::AudioSignal;

/// Full two-sided FFT of a signal plus the frequency axis it is plotted on.
#[derive(Debug, Clone)]
pub struct SpectrumResult {
    frequencies: Vec<f32>,
    bins: Vec<Complex<f32>>,
    sample_rate: u32,
    axis: FrequencyAxis,
}

impl SpectrumResult {
    /// Ascending frequency of each plotted point, in Hz.
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Raw FFT output, `N` complex values.
    pub fn bins(&self) -> &[Complex<f32>] {
        &self.bins
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn axis(&self) -> FrequencyAxis {
        self.axis
    }

    /// Factor turning `|X[k]|` into a one-sided amplitude.
    pub fn normalization(&self) -> f32 {
        match self.axis {
            FrequencyAxis::SampleCount => 2.0 / self.bins.len() as f32,
            FrequencyAxis::SampleRate => 2.0 / self.sample_rate as f32,
        }
    }

    /// One-sided amplitude spectrum, one value per entry of [`frequencies`](Self::frequencies).
    pub fn amplitudes(&self) -> Vec<f32> {
        let norm = self.normalization();
        self.bins[..self.frequencies.len()]
            .iter()
            .map(|c| norm * c.norm())
            .collect()
    }

    /// Frequency with the largest amplitude, ignoring DC.
    pub fn peak_frequency(&self) -> Option<f32> {
        let amplitudes = self.amplitudes();
        let (idx, &max) = amplitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
        (max > 0.0).then(|| self.frequencies[idx])
    }
}

/// Frequencies of the first `count` FFT bins of an `n`-point transform.
pub fn bin_frequencies(sample_rate: u32, n: usize, count: usize) -> Vec<f32> {
    let resolution = sample_rate as f64 / n as f64;
    (0..count).map(|k| (k as f64 * resolution) as f32).collect()
}

/// `count` evenly spaced points from 0 Hz to Nyquist, both ends included.
pub fn frequency_axis(sample_rate: u32, count: usize) -> Vec<f32> {
    let nyquist = sample_rate as f64 / 2.0;
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = nyquist / (count - 1) as f64;
            (0..count).map(|i| (i as f64 * step) as f32).collect()
        }
    }
}

pub fn transform(signal: &AudioSignal) -> Result<SpectrumResult, ComputationError> {
    transform_with(signal, FrequencyAxis::default())
}

/// Computes the FFT of every sample in `signal`.
pub fn transform_with(
    signal: &AudioSignal,
    axis: FrequencyAxis,
) -> Result<SpectrumResult, ComputationError> {
    if signal.is_empty() {
        return Err(ComputationError::EmptySignal);
    }
    let n = signal.len();
    let sample_rate = signal.sample_rate();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    let mut bins: Vec<Complex<f32>> = signal
        .samples()
        .iter()
        .map(|&s| Complex::new(s, 0.0))
        .collect();
    fft.process(&mut bins);

    let frequencies = match axis {
        FrequencyAxis::SampleCount => bin_frequencies(sample_rate, n, n / 2),
        FrequencyAxis::SampleRate => {
            let mut freqs = frequency_axis(sample_rate, sample_rate as usize / 2);
            freqs.truncate(n);
            freqs
        }
    };
    debug!(
        "fft of {} samples at {} Hz, {} frequency points ({:?})",
        n,
        sample_rate,
        frequencies.len(),
        axis
    );

    Ok(SpectrumResult {
        frequencies,
        bins,
        sample_rate,
        axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> AudioSignal {
        let samples = (0..len)
            .map(|n| (2.0 * PI * freq * n as f32 / sample_rate as f32).sin())
            .collect();
        AudioSignal::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn zero_signal_has_zero_spectrum() {
        let signal = AudioSignal::new(vec![0.0; 1000], 8000).unwrap();
        let spectrum = transform(&signal).unwrap();
        assert_eq!(spectrum.frequencies().len(), 500);
        assert!(spectrum.amplitudes().iter().all(|&a| a == 0.0));
        assert_eq!(spectrum.peak_frequency(), None);
    }

    #[test]
    fn sine_peaks_at_its_frequency() {
        let spectrum = transform(&sine(1000.0, 8000, 4000)).unwrap();
        let peak = spectrum.peak_frequency().unwrap();
        assert!((peak - 1000.0).abs() <= 2.0, "peak at {peak}");
    }

    #[test]
    fn one_second_sine_has_unit_amplitude() {
        let spectrum = transform(&sine(440.0, 44100, 44100)).unwrap();
        let amplitudes = spectrum.amplitudes();
        let peak = amplitudes.iter().cloned().fold(0.0, f32::max);
        assert!((peak - 1.0).abs() < 0.01, "amplitude {peak}");
        assert_eq!(spectrum.peak_frequency(), Some(440.0));
    }

    #[test]
    fn axis_modes_agree_for_one_second() {
        let signal = sine(100.0, 1000, 1000);
        let fixed = transform_with(&signal, FrequencyAxis::SampleCount).unwrap();
        let legacy = transform_with(&signal, FrequencyAxis::SampleRate).unwrap();
        assert_eq!(fixed.frequencies().len(), legacy.frequencies().len());
        assert_eq!(fixed.normalization(), legacy.normalization());
        assert_eq!(fixed.peak_frequency(), Some(100.0));
        let legacy_peak = legacy.peak_frequency().unwrap();
        assert!((legacy_peak - 100.0).abs() < 1.0);
    }

    #[test]
    fn legacy_axis_ignores_sample_count() {
        let signal = sine(100.0, 1000, 2000);
        let legacy = transform_with(&signal, FrequencyAxis::SampleRate).unwrap();
        assert_eq!(legacy.frequencies().len(), 500);
        assert_eq!(legacy.amplitudes().len(), 500);
        assert_eq!(*legacy.frequencies().last().unwrap(), 500.0);

        let fixed = transform(&signal).unwrap();
        assert_eq!(fixed.frequencies().len(), 1000);
    }

    #[test]
    fn legacy_axis_is_truncated_for_short_signals() {
        let signal = sine(100.0, 1000, 200);
        let legacy = transform_with(&signal, FrequencyAxis::SampleRate).unwrap();
        assert_eq!(legacy.frequencies().len(), 200);
        assert_eq!(legacy.amplitudes().len(), 200);
    }

    #[test]
    fn empty_signal_is_rejected() {
        let signal = AudioSignal::new(Vec::new(), 44100).unwrap();
        assert_eq!(transform(&signal).unwrap_err(), ComputationError::EmptySignal);
    }

    #[test]
    fn frequency_axis_spans_zero_to_nyquist() {
        let axis = frequency_axis(44100, 11);
        assert_eq!(axis[0], 0.0);
        assert_eq!(axis[10], 22050.0);
        assert_eq!(frequency_axis(44100, 1), vec![0.0]);
    }
}
