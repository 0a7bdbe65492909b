//! Sample-rate conversion for speech buffers
//!
//! Provides a [`RubatoResampler`] implementing [`sv56_level::Resampler`], so
//! whole mono buffers can be converted with [`sv56_level::change_sample_rate`]
//! or the [`resample_buffer`] shortcut.
//!
//! ## Example
//!
//! ```rust
//! use sv56_level::SignalBuffer;
//! use sv56_resample::{resample_buffer, ResamplingQuality};
//!
//! let buffer = SignalBuffer::new(vec![0.0; 1600], 16000).unwrap();
//! let narrowband = resample_buffer(&buffer, 8000, ResamplingQuality::Balanced).unwrap();
//! assert_eq!(narrowband.len(), 800);
//! assert_eq!(narrowband.sample_rate(), 8000);
//! ```

#![deny(unsafe_code)]

mod error;
mod rubato_backend;

pub use error::{ResamplingError, Result};
pub use rubato_backend::RubatoResampler;

use sv56_level::SignalBuffer;

/// Resampling quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResamplingQuality {
    /// Polynomial interpolation, lowest CPU
    Fast,

    /// Sinc, 128 taps, 95% passband
    #[default]
    Balanced,

    /// Sinc, 256 taps, 99% passband
    High,

    /// Sinc, 512 taps, 99.5% passband
    Maximum,
}

impl ResamplingQuality {
    /// Input frames handed to rubato per call
    pub fn chunk_size(&self) -> usize {
        match self {
            Self::Fast | Self::Balanced => 1024,
            Self::High => 2048,
            Self::Maximum => 4096,
        }
    }
}

/// Convert a buffer to `output_rate` with a fresh [`RubatoResampler`]
pub fn resample_buffer(
    buffer: &SignalBuffer,
    output_rate: u32,
    quality: ResamplingQuality,
) -> sv56_level::Result<SignalBuffer> {
    sv56_level::change_sample_rate(buffer, output_rate, &mut RubatoResampler::new(quality))
}
