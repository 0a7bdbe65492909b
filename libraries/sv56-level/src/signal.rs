//! Mono sample buffers and fixed-point conversion
//!
//! Samples are held as `f32` normalized so that full scale is 1.0. Buffers
//! built from fixed-point data remember their bit depth, which determines the
//! representable range when gain is applied and the quantization used when
//! converting back.

use crate::error::{Result, Sv56Error};
use crate::{MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
use serde::{Deserialize, Serialize};

/// Sample representation the buffer was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Floating point, representable range -1.0..=1.0
    #[default]
    Float,
    /// Two's complement PCM with the given resolution
    Pcm {
        /// Bits per sample (2-32)
        bits: u32,
    },
}

impl SampleFormat {
    /// Largest representable sample value
    pub fn max_value(&self) -> f64 {
        match self {
            Self::Float => 1.0,
            Self::Pcm { bits } => 1.0 - 1.0 / pcm_full_scale(*bits),
        }
    }

    /// Smallest representable sample value
    pub fn min_value(&self) -> f64 {
        -1.0
    }

    /// Saturate a scaled sample to the representable range.
    ///
    /// PCM values are truncated toward zero onto the quantization grid.
    /// Returns the stored value and whether saturation occurred.
    pub fn saturate(&self, value: f64) -> (f32, bool) {
        let clipped = value > self.max_value() || value < self.min_value();
        let bounded = value.clamp(self.min_value(), self.max_value());
        let stored = match self {
            Self::Float => bounded,
            Self::Pcm { bits } => {
                let scale = pcm_full_scale(*bits);
                (bounded * scale).trunc() / scale
            }
        };
        (stored as f32, clipped)
    }
}

fn pcm_full_scale(bits: u32) -> f64 {
    2.0_f64.powi(bits as i32 - 1)
}

fn validate_sample_rate(sample_rate: u32) -> Result<()> {
    if (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        Ok(())
    } else {
        Err(Sv56Error::InvalidSampleRate(sample_rate))
    }
}

fn validate_bits(bits: u32) -> Result<()> {
    if (2..=32).contains(&bits) {
        Ok(())
    } else {
        Err(Sv56Error::InvalidBitDepth(bits))
    }
}

/// A monophonic signal with its sample rate and level reference
///
/// `ref_db` shifts every reported level: a level of `L` dB relative to full
/// scale is reported as `L - ref_db`.
///
/// # Example
///
/// ```
/// use sv56_level::SignalBuffer;
///
/// let buffer = SignalBuffer::new(vec![0.0; 1600], 16000)?.with_ref_db(0.0);
/// assert_eq!(buffer.len(), 1600);
/// # Ok::<(), sv56_level::Sv56Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    ref_db: f64,
    format: SampleFormat,
}

impl SignalBuffer {
    /// Create a buffer from normalized floating-point samples
    ///
    /// # Errors
    /// Returns error if the sample rate is outside 8000-384000 Hz
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        Ok(Self {
            samples,
            sample_rate,
            ref_db: 0.0,
            format: SampleFormat::Float,
        })
    }

    /// Create a buffer from 16-bit PCM samples
    pub fn from_i16(samples: &[i16], sample_rate: u32) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        let scale = pcm_full_scale(16);
        Ok(Self {
            samples: samples.iter().map(|&s| (s as f64 / scale) as f32).collect(),
            sample_rate,
            ref_db: 0.0,
            format: SampleFormat::Pcm { bits: 16 },
        })
    }

    /// Create a buffer from right-aligned PCM samples of the given resolution
    ///
    /// A 14-bit sample of 8191 maps to just under 1.0.
    pub fn from_pcm_i32(samples: &[i32], bits: u32, sample_rate: u32) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        validate_bits(bits)?;
        let scale = pcm_full_scale(bits);
        Ok(Self {
            samples: samples.iter().map(|&s| (s as f64 / scale) as f32).collect(),
            sample_rate,
            ref_db: 0.0,
            format: SampleFormat::Pcm { bits },
        })
    }

    /// Set the level reference in dB
    pub fn with_ref_db(mut self, ref_db: f64) -> Self {
        self.ref_db = ref_db;
        self
    }

    /// Build a buffer sharing this buffer's rate, reference and format
    pub(crate) fn derive(&self, samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            ref_db: self.ref_db,
            format: self.format,
        }
    }

    /// The samples, normalized to full scale 1.0
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume the buffer and return its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Level reference in dB
    pub fn ref_db(&self) -> f64 {
        self.ref_db
    }

    /// Sample representation
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Convert to 16-bit PCM with hard clipping and truncation
    pub fn to_i16(&self) -> Vec<i16> {
        let scale = pcm_full_scale(16);
        self.samples
            .iter()
            .map(|&s| {
                (s as f64 * scale)
                    .trunc()
                    .clamp(i16::MIN as f64, i16::MAX as f64) as i16
            })
            .collect()
    }

    /// Convert to right-aligned PCM of the given resolution with hard clipping
    /// and truncation
    pub fn to_pcm_i32(&self, bits: u32) -> Result<Vec<i32>> {
        validate_bits(bits)?;
        let scale = pcm_full_scale(bits);
        let (min, max) = (-scale, scale - 1.0);
        Ok(self
            .samples
            .iter()
            .map(|&s| (s as f64 * scale).trunc().clamp(min, max) as i32)
            .collect())
    }
}
