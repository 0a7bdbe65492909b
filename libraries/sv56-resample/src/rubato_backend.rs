//! Rubato resampler backend
//!
//! Converts whole mono buffers in one call. Input is fed in fixed-size
//! chunks, the tail is zero-padded until the filter delay has drained, and the
//! delay is trimmed from the front so output sample `k` lines up with input
//! time `k / output_rate`.

use crate::error::{ResamplingError, Result};
use crate::ResamplingQuality;
use rubato::{
    FastFixedIn, PolynomialDegree, Resampler as RubatoResamplerTrait, SincFixedIn,
    SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use sv56_level::{expected_output_len, BoxError, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
use tracing::debug;

/// Zero-padded chunks allowed for draining the filter delay
const MAX_FLUSH_CHUNKS: usize = 64;

/// Enum to hold different rubato resampler types
enum RubatoResamplerType {
    FastIn(FastFixedIn<f32>),
    SincIn(SincFixedIn<f32>),
}

/// A rubato instance built for one rate pair
struct Configured {
    input_rate: u32,
    output_rate: u32,
    resampler: RubatoResamplerType,
}

/// Rubato-based resampler for whole mono buffers
///
/// The underlying filter is rebuilt only when the rate pair changes; repeated
/// conversions between the same rates reuse it after a reset.
pub struct RubatoResampler {
    quality: ResamplingQuality,
    configured: Option<Configured>,
}

impl RubatoResampler {
    /// Create a resampler with the given quality preset
    pub fn new(quality: ResamplingQuality) -> Self {
        Self {
            quality,
            configured: None,
        }
    }

    /// Quality preset in use
    pub fn quality(&self) -> ResamplingQuality {
        self.quality
    }

    /// Convert `samples` from `input_rate` to `output_rate`
    ///
    /// Returns exactly `round(samples.len() * output_rate / input_rate)`
    /// samples. Equal rates return a copy of the input.
    pub fn process(
        &mut self,
        samples: &[f32],
        input_rate: u32,
        output_rate: u32,
    ) -> Result<Vec<f32>> {
        for rate in [input_rate, output_rate] {
            if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) {
                return Err(ResamplingError::InvalidSampleRate(rate));
            }
        }

        // 1:1 passthrough
        if input_rate == output_rate || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        let expected = expected_output_len(samples.len(), input_rate, output_rate);
        let resampler = self.prepare(input_rate, output_rate)?;
        let output = match resampler {
            RubatoResamplerType::FastIn(r) => convert(r, samples, expected)?,
            RubatoResamplerType::SincIn(r) => convert(r, samples, expected)?,
        };

        debug!(
            "Resampled {} samples from {} Hz to {} samples at {} Hz ({:?})",
            samples.len(),
            input_rate,
            output.len(),
            output_rate,
            self.quality
        );
        Ok(output)
    }

    /// Get a resampler for the rate pair, reusing the last one if it matches
    fn prepare(&mut self, input_rate: u32, output_rate: u32) -> Result<&mut RubatoResamplerType> {
        let reusable = self
            .configured
            .as_ref()
            .is_some_and(|c| c.input_rate == input_rate && c.output_rate == output_rate);

        if !reusable {
            self.configured = Some(Configured {
                input_rate,
                output_rate,
                resampler: self.build(input_rate, output_rate)?,
            });
        }

        let configured = self
            .configured
            .as_mut()
            .ok_or_else(|| ResamplingError::InitializationFailed("no resampler".to_string()))?;

        if reusable {
            // Clear filter state left by the previous buffer
            match &mut configured.resampler {
                RubatoResamplerType::FastIn(r) => r.reset(),
                RubatoResamplerType::SincIn(r) => r.reset(),
            }
        }

        Ok(&mut configured.resampler)
    }

    fn build(&self, input_rate: u32, output_rate: u32) -> Result<RubatoResamplerType> {
        let ratio = output_rate as f64 / input_rate as f64;
        let chunk_size = self.quality.chunk_size();

        let resampler = match Self::quality_to_params(self.quality) {
            None => RubatoResamplerType::FastIn(
                FastFixedIn::new(ratio, 1.0, PolynomialDegree::Linear, chunk_size, 1).map_err(
                    |e| {
                        ResamplingError::InitializationFailed(format!(
                            "FastFixedIn creation failed: {}",
                            e
                        ))
                    },
                )?,
            ),
            Some(params) => RubatoResamplerType::SincIn(
                SincFixedIn::<f32>::new(ratio, 1.0, params, chunk_size, 1)
                    .map_err(|e| {
                        ResamplingError::InitializationFailed(format!(
                            "SincFixedIn creation failed: {}",
                            e
                        ))
                    })?,
            ),
        };

        debug!(
            "Built {:?} resampler for {} Hz -> {} Hz (ratio {:.5})",
            self.quality,
            input_rate,
            output_rate,
            ratio
        );
        Ok(resampler)
    }

    /// Sinc parameters for a quality preset; `None` selects polynomial
    /// interpolation
    fn quality_to_params(quality: ResamplingQuality) -> Option<SincInterpolationParameters> {
        let params = match quality {
            ResamplingQuality::Fast => return None,
            ResamplingQuality::Balanced => SincInterpolationParameters {
                sinc_len: 128,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Cubic,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris,
            },
            ResamplingQuality::High => SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.99,
                interpolation: SincInterpolationType::Cubic,
                oversampling_factor: 512,
                window: WindowFunction::BlackmanHarris,
            },
            ResamplingQuality::Maximum => SincInterpolationParameters {
                sinc_len: 512,
                f_cutoff: 0.995,
                interpolation: SincInterpolationType::Cubic,
                oversampling_factor: 1024,
                window: WindowFunction::BlackmanHarris2,
            },
        };
        Some(params)
    }
}

impl Default for RubatoResampler {
    fn default() -> Self {
        Self::new(ResamplingQuality::default())
    }
}

impl sv56_level::Resampler for RubatoResampler {
    fn resample(
        &mut self,
        samples: &[f32],
        input_rate: u32,
        output_rate: u32,
    ) -> std::result::Result<Vec<f32>, BoxError> {
        Ok(self.process(samples, input_rate, output_rate)?)
    }
}

fn first_channel(frames: Vec<Vec<f32>>) -> Vec<f32> {
    frames.into_iter().next().unwrap_or_default()
}

fn processing_failed(e: rubato::ResampleError) -> ResamplingError {
    ResamplingError::ProcessingFailed(e.to_string())
}

/// Run a whole buffer through a fixed-input resampler
fn convert<R: RubatoResamplerTrait<f32>>(
    resampler: &mut R,
    samples: &[f32],
    expected: usize,
) -> Result<Vec<f32>> {
    let delay = resampler.output_delay();
    let wanted = expected + delay;
    let mut output = Vec::with_capacity(wanted + resampler.output_frames_max());

    // Complete chunks
    let mut position = 0;
    while samples.len() - position >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let chunk: [&[f32]; 1] = [&samples[position..position + needed]];
        let frames = resampler.process(&chunk[..], None).map_err(processing_failed)?;
        output.extend(first_channel(frames));
        position += needed;
    }

    // Remainder, zero-padded to a chunk
    if position < samples.len() {
        let chunk: [&[f32]; 1] = [&samples[position..]];
        let frames = resampler
            .process_partial(Some(&chunk[..]), None)
            .map_err(processing_failed)?;
        output.extend(first_channel(frames));
    }

    // Drain the filter delay
    let mut flushes = 0;
    while output.len() < wanted {
        if flushes == MAX_FLUSH_CHUNKS {
            return Err(ResamplingError::ProcessingFailed(format!(
                "filter delay not drained after {} chunks ({} of {} samples)",
                MAX_FLUSH_CHUNKS,
                output.len(),
                wanted
            )));
        }
        let frames = resampler
            .process_partial(None::<&[Vec<f32>]>, None)
            .map_err(processing_failed)?;
        output.extend(first_channel(frames));
        flushes += 1;
    }

    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubato_creation() {
        let resampler = RubatoResampler::new(ResamplingQuality::High);
        assert_eq!(resampler.quality(), ResamplingQuality::High);
        assert_eq!(
            RubatoResampler::default().quality(),
            ResamplingQuality::Balanced
        );
    }

    #[test]
    fn test_quality_presets() {
        assert!(RubatoResampler::quality_to_params(ResamplingQuality::Fast).is_none());

        let sinc_lens: Vec<usize> = [
            ResamplingQuality::Balanced,
            ResamplingQuality::High,
            ResamplingQuality::Maximum,
        ]
        .into_iter()
        .map(|q| RubatoResampler::quality_to_params(q).unwrap().sinc_len)
        .collect();
        assert_eq!(sinc_lens, vec![128, 256, 512]);
    }

    #[test]
    fn test_process_empty() {
        let mut resampler = RubatoResampler::new(ResamplingQuality::Fast);
        let output = resampler.process(&[], 16000, 8000).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_passthrough() {
        let mut resampler = RubatoResampler::new(ResamplingQuality::Maximum);
        let input = [0.1, -0.2, 0.3];
        assert_eq!(resampler.process(&input, 16000, 16000).unwrap(), input.to_vec());
    }

    #[test]
    fn test_invalid_rates() {
        let mut resampler = RubatoResampler::default();
        assert!(matches!(
            resampler.process(&[0.0; 10], 0, 16000),
            Err(ResamplingError::InvalidSampleRate(0))
        ));
        assert!(matches!(
            resampler.process(&[0.0; 10], 16000, 1_000_000),
            Err(ResamplingError::InvalidSampleRate(1_000_000))
        ));
    }

    #[test]
    fn test_exact_lengths() {
        for quality in [
            ResamplingQuality::Fast,
            ResamplingQuality::Balanced,
            ResamplingQuality::High,
        ] {
            let mut resampler = RubatoResampler::new(quality);
            assert_eq!(resampler.process(&[0.0; 16000], 16000, 8000).unwrap().len(), 8000);
            assert_eq!(resampler.process(&[0.0; 1001], 16000, 44100).unwrap().len(), 2759);
            assert_eq!(resampler.process(&[0.0; 3], 48000, 8000).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_reuse_is_stateless() {
        let input: Vec<f32> = (0..4000).map(|i| ((i as f32) * 0.05).sin() * 0.5).collect();
        let mut resampler = RubatoResampler::default();

        let first = resampler.process(&input, 16000, 8000).unwrap();
        let second = resampler.process(&input, 16000, 8000).unwrap();
        assert_eq!(first, second);

        let fresh = RubatoResampler::default().process(&input, 16000, 8000).unwrap();
        assert_eq!(first, fresh);
    }
}
