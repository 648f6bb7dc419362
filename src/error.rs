use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a recording from disk.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("malformed WAV data: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported sample format: {format:?} with {bits} bits per sample")]
    Unsupported {
        format: hound::SampleFormat,
        bits: u16,
    },

    #[error("recording has no channels")]
    NoChannels,

    #[error("recording declares a sampling rate of 0 Hz")]
    ZeroSampleRate,

    #[error("failed to set up resampler: {0}")]
    ResamplerSetup(#[from] rubato::ResamplerConstructionError),

    #[error("resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),
}

/// Input the analyzer refuses to transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("cannot transform an empty signal")]
    EmptySignal,

    #[error("sampling rate must be positive")]
    InvalidSampleRate,

    #[error("invalid segment: overlap {overlap} must be smaller than segment length {nperseg}")]
    InvalidSegment { nperseg: usize, overlap: usize },

    #[error("tukey window alpha must lie in [0, 1], got {0}")]
    InvalidWindow(f32),
}

/// The windowing backend's error is neither `Send` nor `Sync`, so only its
/// message is kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("could not open plot window: {0}")]
    Window(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
