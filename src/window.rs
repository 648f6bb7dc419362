//! Window functions applied to segments before the short-time transform.

use std::f32::consts::PI;

use crate::error::ComputationError;

/// Tukey (tapered cosine) window of `len` samples.
///
/// `alpha` is the fraction of the window inside the cosine tapers:
/// `0.0` gives a rectangular window, `1.0` a Hann window.
/// A periodic window is computed as a symmetric one of `len + 1` samples
/// with the last sample dropped, which is what spectral analysis wants.
pub fn tukey(len: usize, alpha: f32, periodic: bool) -> Result<Vec<f32>, ComputationError> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(ComputationError::InvalidWindow(alpha));
    }
    if len <= 1 {
        return Ok(vec![1.0; len]);
    }
    if alpha == 0.0 {
        return Ok(vec![1.0; len]);
    }

    let m = if periodic { len + 1 } else { len };
    let last = (m - 1) as f32;
    let width = alpha * last / 2.0;

    let window = (0..len)
        .map(|n| {
            let n = n as f32;
            if n < width {
                0.5 * (1.0 + (PI * (-1.0 + n / width)).cos())
            } else if n <= last - width {
                1.0
            } else {
                0.5 * (1.0 + (PI * (-2.0 / alpha + 1.0 + n / width)).cos())
            }
        })
        .collect();
    Ok(window)
}

/// Sum of squared coefficients, used for power spectral density scaling.
pub fn power_sum(window: &[f32]) -> f32 {
    window.iter().map(|w| w * w).sum()
}
