//! Error types for speech level measurement

use thiserror::Error;

/// Result type for speech level operations
pub type Result<T> = std::result::Result<T, Sv56Error>;

/// Boxed error returned by resampler collaborators
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during measurement, normalization or rate conversion
#[derive(Error, Debug)]
pub enum Sv56Error {
    /// No samples were provided for analysis
    #[error("No audio samples provided for analysis")]
    EmptyInput,

    /// No sample was classified as active speech
    #[error("Audio is silent (no active speech level could be determined)")]
    SilentInput,

    /// Target level cannot be reached with a representable gain
    #[error("Invalid target level: {0} dB")]
    InvalidTarget(f64),

    /// Invalid sample rate
    #[error("Invalid sample rate: {0} Hz (must be between 8000 and 384000)")]
    InvalidSampleRate(u32),

    /// Invalid PCM bit depth
    #[error("Invalid bit depth: {0} bits (must be 2-32)")]
    InvalidBitDepth(u32),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// The resampler collaborator failed
    #[error("Resampling failed: {0}")]
    Resample(#[source] BoxError),

    /// The resampler returned a different number of samples than requested
    #[error("Resampler returned {actual} samples, expected {expected}")]
    ResampleLength {
        /// Sample count implied by the rate ratio
        expected: usize,
        /// Sample count actually returned
        actual: usize,
    },
}

impl From<config::ConfigError> for Sv56Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
