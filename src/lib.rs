//! Load audio recordings and plot their waveform, Fourier transform and
//! spectrogram.
//!
//! The pipeline is strictly linear: [`loader`] → [`spectrum`] /
//! [`spectrogram`] → [`render`], run once per recording.

use log::info;

pub mod config;
pub mod error;
pub mod loader;
pub mod render;
pub mod spectrogram;
pub mod spectrum;
pub mod window;

pub use config::{Config, FrequencyAxis, LoadOptions, Recording, SpectrogramConfig};
pub use error::{ComputationError, DecodeError, Error, RenderError, Result};
pub use loader::{load, load_with, AudioSignal};
pub use render::{plot_spectrogram, plot_spectrum, plot_waveform};
pub use spectrogram::{spectrogram, spectrogram_with, SpectrogramResult};
pub use spectrum::{transform, transform_with, SpectrumResult};

/// Everything computed for one recording, ready to plot.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub signal: AudioSignal,
    pub spectrum: SpectrumResult,
    pub spectrogram: SpectrogramResult,
}

/// Loads and transforms a single recording without showing anything.
pub fn analyze(recording: &Recording, config: &Config) -> Result<Analysis> {
    let signal = load_with(&recording.path, &config.load)?;
    let spectrum = transform_with(&signal, config.axis)?;
    let spectrogram = spectrogram_with(&signal, &config.spectrogram)?;
    if let Some(peak) = spectrum.peak_frequency() {
        info!("{}: spectral peak at {:.1} Hz", recording.label, peak);
    }
    Ok(Analysis {
        signal,
        spectrum,
        spectrogram,
    })
}

/// Shows the three plots of an analysed recording, one window after another.
pub fn show(recording: &Recording, analysis: &Analysis, config: &Config) -> Result<()> {
    plot_waveform(&analysis.signal, &recording.waveform_title())?;
    plot_spectrum(
        &analysis.spectrum,
        analysis.signal.sample_rate(),
        &recording.spectrum_title(),
    )?;
    render::plot_spectrogram_with(
        &analysis.spectrogram,
        &recording.spectrogram_title(),
        config.dynamic_range_db,
    )?;
    Ok(())
}

/// Runs the whole pipeline for every configured recording in turn.
pub fn run(config: &Config) -> Result<()> {
    for recording in &config.recordings {
        info!("analysing {}", recording.path.display());
        let analysis = analyze(recording, config)?;
        show(recording, &analysis, config)?;
    }
    Ok(())
}
