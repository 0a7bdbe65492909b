//! ITU-T P.56 speech level measurement for mono recordings
//!
//! This crate provides:
//! - Active speech level measurement (P.56 method B speech voltmeter)
//! - Long-term RMS level, peaks, DC offset and activity factor
//! - Gain calculation to a target level with clipping forecasts
//! - Level equalization with saturation at the sample format's range
//! - Sample-rate change through a pluggable [`Resampler`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ SignalBuffer │ ──► │ LevelAnalyzer │ ──► │ LevelReport  │
//! └──────────────┘     └───────────────┘     └──────────────┘
//!        │                                          │
//!        │                                          ▼
//!        │             ┌───────────────┐     ┌──────────────┐
//!        └───────────► │  Normalizer   │ ◄── │    Gain      │
//!                      └───────────────┘     │  Calculator  │
//!                             │              └──────────────┘
//!                             ▼
//!                  scaled SignalBuffer + re-measured LevelReport
//!
//! Rate change:
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ SignalBuffer │ ──► │   Resampler   │ ──► │ SignalBuffer │
//! └──────────────┘     └───────────────┘     └──────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sv56_level::{measure, normalize, SignalBuffer};
//!
//! let buffer = SignalBuffer::from_i16(&pcm, 16000)?;
//! let report = measure(&buffer)?;
//! println!("{}", report);
//!
//! let outcome = normalize(&buffer, -26.0)?;
//! println!("Gain: {:.4}, clipped: {}", outcome.gain.gain, outcome.clipped_samples);
//! let pcm_out = outcome.buffer.to_i16();
//! ```

#![deny(unsafe_code)]

mod config;
mod error;
mod gain;
mod normalizer;
mod report;
mod resample;
mod signal;
mod voltmeter;

pub use config::{GainReference, NormalizationSettings, Sv56Config, VoltmeterConfig};
pub use error::{BoxError, Result, Sv56Error};
pub use gain::{GainCalculator, GainResult};
pub use normalizer::{apply_gain, normalize, NormalizationOutcome, Normalizer};
pub use report::LevelReport;
pub use resample::{change_sample_rate, expected_output_len, Resampler};
pub use signal::{SampleFormat, SignalBuffer};
pub use voltmeter::{measure, measure_with_config, LevelAnalyzer};

/// Level reported for silence, in dB re full scale
pub const LEVEL_FLOOR_DB: f64 = -100.0;

/// Highest reachable target level, in dB re full scale
pub const MAX_TARGET_DBFS: f64 = 0.0;

/// Conventional speech target level (-26 dB re full scale)
pub const DEFAULT_TARGET_DB: f64 = -26.0;

/// Number of thresholds in the voltmeter bank, spaced 6.02 dB apart
pub const THRESHOLD_COUNT: usize = 15;

/// Envelope time constant in seconds
pub const DEFAULT_TIME_CONSTANT_SECS: f64 = 0.03;

/// Hangover time in seconds
pub const DEFAULT_HANGOVER_SECS: f64 = 0.2;

/// Margin between the active level and its threshold in dB
pub const DEFAULT_MARGIN_DB: f64 = 15.9;

/// Time constant of the DC estimate in seconds
pub const DEFAULT_DC_TIME_CONSTANT_SECS: f64 = 1.0;

/// Lowest supported sample rate in Hz
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Highest supported sample rate in Hz
pub const MAX_SAMPLE_RATE: u32 = 384_000;
