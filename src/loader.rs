//! Reading recordings from disk into mono sample sequences.

use hound::{SampleFormat, WavReader, WavSpec};
use log::{debug, info};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use smallvec::{smallvec as svec, SmallVec};
use std::path::Path;

use crate::config::LoadOptions;
use crate::error::{ComputationError, DecodeError};

/// De-interleaved samples, one vector per channel.
pub type Channels = SmallVec<[Vec<f32>; 2]>;

/// Mono amplitude samples paired with their sampling rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, ComputationError> {
        if sample_rate == 0 {
            return Err(ComputationError::InvalidSampleRate);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Loads a recording as mono at the default target rate.
pub fn load<P: AsRef<Path>>(path: P) -> Result<AudioSignal, DecodeError> {
    load_with(path, &LoadOptions::default())
}

pub fn load_with<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<AudioSignal, DecodeError> {
    let path = path.as_ref();
    let (spec, channels) = read_wav(path)?;
    let mut samples = downmix(&channels);
    let mut sample_rate = spec.sample_rate;

    if let Some(target) = options.target_rate {
        if target != sample_rate && !samples.is_empty() {
            samples = resample(&samples, sample_rate, target)?;
            sample_rate = target;
        }
    }

    info!(
        "loaded {}: {} samples at {} Hz",
        path.display(),
        samples.len(),
        sample_rate
    );
    AudioSignal::new(samples, sample_rate).map_err(|_| DecodeError::ZeroSampleRate)
}

/// Reads a WAV file into per-channel `f32` samples in `[-1, 1)`.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(WavSpec, Channels), DecodeError> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = reader.spec();
    debug!("wav spec for {}: {:?}", path.display(), spec);

    let num_channels = spec.channels as usize;
    if num_channels == 0 {
        return Err(DecodeError::NoChannels);
    }
    let mut data: Channels = svec![];
    for _ in 0..num_channels {
        data.push(Vec::with_capacity(reader.duration() as usize));
    }

    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, bits @ 1..=32) => {
            let scale = (1_u64 << (bits - 1)) as f32;
            for (i, result) in reader.samples::<i32>().enumerate() {
                data[i % num_channels].push(result? as f32 / scale);
            }
        }
        (SampleFormat::Float, 32) => {
            for (i, result) in reader.samples::<f32>().enumerate() {
                data[i % num_channels].push(result?);
            }
        }
        (format, bits) => return Err(DecodeError::Unsupported { format, bits }),
    }

    Ok((spec, data))
}

/// Averages all channels into one.
pub fn downmix(channels: &Channels) -> Vec<f32> {
    match channels.len() {
        0 => Vec::new(),
        1 => channels[0].clone(),
        n => {
            let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
            (0..frames)
                .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Band-limited sinc resampling of a whole signal.
///
/// The result holds exactly `ceil(len * to / from)` samples, aligned with
/// the input: the filter delay is dropped from the front and the tail is
/// flushed out of the filter.
pub fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>, DecodeError> {
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    let expected = (samples.len() as u64 * to as u64).div_ceil(from as u64) as usize;
    debug!(
        "resampling {} samples from {} Hz to {} Hz into {}",
        samples.len(),
        from,
        to,
        expected
    );

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler =
        SincFixedIn::<f32>::new(to as f64 / from as f64, 2.0, params, samples.len(), 1)?;
    let delay = resampler.output_delay();

    let waves_in = [samples];
    let mut out = resampler
        .process(&waves_in[..], None)?
        .pop()
        .unwrap_or_default();
    while out.len() < delay + expected {
        let tail = resampler
            .process_partial(None::<&[Vec<f32>]>, None)?
            .pop()
            .unwrap_or_default();
        if tail.is_empty() {
            break;
        }
        out.extend(tail);
    }

    out.drain(..delay.min(out.len()));
    out.resize(expected, 0.0);
    Ok(out)
}
