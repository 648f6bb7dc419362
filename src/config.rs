use std::path::{Path, PathBuf};

/// Rate recordings are resampled to unless told otherwise.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

pub const DEFAULT_SEGMENT_LEN: usize = 256;
pub const DEFAULT_TUKEY_ALPHA: f32 = 0.25;
pub const DEFAULT_DYNAMIC_RANGE_DB: f32 = 80.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// `None` keeps the file's own sampling rate.
    pub target_rate: Option<u32>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            target_rate: Some(DEFAULT_SAMPLE_RATE),
        }
    }
}

/// How the spectrum's frequency axis is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyAxis {
    /// `N / 2` points, amplitudes scaled by `2 / N`.
    #[default]
    SampleCount,
    /// `sample_rate / 2` points, amplitudes scaled by `2 / sample_rate`.
    /// Only consistent for exactly one second of audio.
    SampleRate,
}

/// Short-time transform parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramConfig {
    /// Samples per segment.
    pub nperseg: usize,
    /// Samples shared by consecutive segments.
    pub overlap: usize,
    /// Tapered fraction of the Tukey window.
    pub alpha: f32,
}

impl SpectrogramConfig {
    pub fn with_segment(nperseg: usize) -> Self {
        Self {
            nperseg,
            overlap: nperseg / 2,
            ..Default::default()
        }
    }

    pub fn hop(&self) -> usize {
        self.nperseg.saturating_sub(self.overlap)
    }
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            nperseg: DEFAULT_SEGMENT_LEN,
            overlap: DEFAULT_SEGMENT_LEN / 2,
            alpha: DEFAULT_TUKEY_ALPHA,
        }
    }
}

/// A file to analyse and the name used in plot titles.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub path: PathBuf,
    pub label: String,
}

impl Recording {
    /// Labels the recording after its capitalised file stem, so
    /// `data/violin.wav` becomes `Violin`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut chars = stem.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::from("No Title"),
        };
        Self { path, label }
    }

    pub fn waveform_title(&self) -> String {
        format!("{} Original Waveform", self.label)
    }

    pub fn spectrum_title(&self) -> String {
        format!("{} Fourier Transform", self.label)
    }

    pub fn spectrogram_title(&self) -> String {
        format!("{} Spectrogram", self.label)
    }
}

/// Everything one invocation of the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub recordings: Vec<Recording>,
    pub load: LoadOptions,
    pub axis: FrequencyAxis,
    pub spectrogram: SpectrogramConfig,
    pub dynamic_range_db: f32,
}

impl Config {
    pub fn default_recordings() -> Vec<Recording> {
        ["violin.wav", "trumpet.wav"]
            .iter()
            .map(|name| Recording::from_path(Path::new("data").join(name)))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recordings: Self::default_recordings(),
            load: LoadOptions::default(),
            axis: FrequencyAxis::default(),
            spectrogram: SpectrogramConfig::default(),
            dynamic_range_db: DEFAULT_DYNAMIC_RANGE_DB,
        }
    }
}
