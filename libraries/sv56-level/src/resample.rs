//! Sample-rate change through a pluggable resampler
//!
//! The level engine never filters samples itself. A [`Resampler`] is handed
//! whole mono buffers and must return exactly `round(n * output / input)`
//! samples; the `sv56-resample` crate provides a rubato-based implementation.

use crate::error::{BoxError, Result, Sv56Error};
use crate::signal::SignalBuffer;
use crate::{MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
use tracing::debug;

/// Converts a whole mono buffer from one sample rate to another
#[cfg_attr(test, mockall::automock)]
pub trait Resampler {
    /// Resample `samples` from `input_rate` to `output_rate`
    fn resample(
        &mut self,
        samples: &[f32],
        input_rate: u32,
        output_rate: u32,
    ) -> std::result::Result<Vec<f32>, BoxError>;
}

/// Number of samples a conversion of `len` samples must produce
pub fn expected_output_len(len: usize, input_rate: u32, output_rate: u32) -> usize {
    let input_rate = u128::from(input_rate);
    ((len as u128 * u128::from(output_rate) + input_rate / 2) / input_rate) as usize
}

/// Convert a buffer to `output_rate`
///
/// Equal rates return a copy of the input without calling the resampler. The
/// result keeps the input's level reference and sample format.
///
/// # Errors
/// - `InvalidSampleRate` if `output_rate` is outside 8000-384000 Hz
/// - `Resample` if the resampler fails
/// - `ResampleLength` if the resampler returns the wrong number of samples
pub fn change_sample_rate<R: Resampler + ?Sized>(
    buffer: &SignalBuffer,
    output_rate: u32,
    resampler: &mut R,
) -> Result<SignalBuffer> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&output_rate) {
        return Err(Sv56Error::InvalidSampleRate(output_rate));
    }

    let input_rate = buffer.sample_rate();
    if input_rate == output_rate {
        return Ok(buffer.clone());
    }

    let expected = expected_output_len(buffer.len(), input_rate, output_rate);
    let samples = if buffer.is_empty() {
        Vec::new()
    } else {
        resampler
            .resample(buffer.samples(), input_rate, output_rate)
            .map_err(Sv56Error::Resample)?
    };

    if samples.len() != expected {
        return Err(Sv56Error::ResampleLength {
            expected,
            actual: samples.len(),
        });
    }

    debug!(
        "Resampled {} samples at {} Hz to {} samples at {} Hz",
        buffer.len(),
        input_rate,
        samples.len(),
        output_rate
    );

    Ok(buffer.derive(samples, output_rate))
}
