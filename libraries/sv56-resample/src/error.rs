//! Error types for sample-rate conversion

use thiserror::Error;

/// Result type for resampling operations
pub type Result<T> = std::result::Result<T, ResamplingError>;

/// Resampling errors
#[derive(Error, Debug)]
pub enum ResamplingError {
    /// Sample rate outside the supported range
    #[error("Invalid sample rate: {0} Hz (must be between 8000 and 384000)")]
    InvalidSampleRate(u32),

    /// The rubato resampler could not be constructed
    #[error("Resampler initialization failed: {0}")]
    InitializationFailed(String),

    /// The rubato resampler failed while processing
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}
