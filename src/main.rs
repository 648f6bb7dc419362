use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use spectra::config::{DEFAULT_DYNAMIC_RANGE_DB, DEFAULT_SAMPLE_RATE, DEFAULT_SEGMENT_LEN};
use spectra::{Config, FrequencyAxis, LoadOptions, Recording, SpectrogramConfig};

/// Plot the waveform, Fourier transform and spectrogram of audio recordings.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// WAV files to analyse (default: data/violin.wav data/trumpet.wav)
    files: Vec<PathBuf>,

    /// Rate recordings are resampled to
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Keep each file's own sampling rate
    #[arg(long)]
    native_rate: bool,

    /// Spectrogram segment length in samples
    #[arg(long, default_value_t = DEFAULT_SEGMENT_LEN)]
    segment: usize,

    /// Samples shared by consecutive segments (default: half a segment)
    #[arg(long)]
    overlap: Option<usize>,

    /// Size the spectrum axis by sampling rate instead of sample count
    #[arg(long)]
    legacy_axis: bool,

    /// Colour range of the spectrogram below its loudest cell, in dB
    #[arg(long, default_value_t = DEFAULT_DYNAMIC_RANGE_DB)]
    dynamic_range: f32,
}

impl Args {
    fn into_config(self) -> Config {
        let recordings = if self.files.is_empty() {
            Config::default_recordings()
        } else {
            self.files.iter().map(Recording::from_path).collect()
        };
        let mut spectrogram = SpectrogramConfig::with_segment(self.segment);
        if let Some(overlap) = self.overlap {
            spectrogram.overlap = overlap;
        }
        Config {
            recordings,
            load: LoadOptions {
                target_rate: (!self.native_rate).then_some(self.sample_rate),
            },
            axis: if self.legacy_axis {
                FrequencyAxis::SampleRate
            } else {
                FrequencyAxis::SampleCount
            },
            spectrogram,
            dynamic_range_db: self.dynamic_range,
        }
    }
}

// cargo run -r -- data/violin.wav data/trumpet.wav
fn main() -> anyhow::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let config = Args::parse().into_config();
    spectra::run(&config).context("analysis aborted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_give_the_default_config() {
        let config = Args::try_parse_from(["spectra"]).unwrap().into_config();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Args::try_parse_from([
            "spectra",
            "a/flute.wav",
            "--native-rate",
            "--segment",
            "512",
            "--overlap",
            "64",
            "--legacy-axis",
        ])
        .unwrap()
        .into_config();

        assert_eq!(config.recordings.len(), 1);
        assert_eq!(config.recordings[0].label, "Flute");
        assert_eq!(config.load.target_rate, None);
        assert_eq!(config.spectrogram.nperseg, 512);
        assert_eq!(config.spectrogram.overlap, 64);
        assert_eq!(config.axis, FrequencyAxis::SampleRate);
    }
}
