//! Level equalization
//!
//! Measures the input, computes the gain to the target level, scales every
//! sample into a new buffer with hard clipping at the representable range,
//! and re-measures the result so callers see the level actually achieved.

use crate::config::{GainReference, Sv56Config, VoltmeterConfig};
use crate::error::Result;
use crate::gain::{GainCalculator, GainResult};
use crate::report::LevelReport;
use crate::signal::SignalBuffer;
use crate::voltmeter::measure_with_config;
use tracing::{debug, warn};

/// Result of normalizing a buffer
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationOutcome {
    /// Scaled samples
    pub buffer: SignalBuffer,
    /// Report measured on the scaled samples
    pub report: LevelReport,
    /// Report measured on the input
    pub input_report: LevelReport,
    /// Gain that was applied
    pub gain: GainResult,
    /// Samples saturated at the representable range
    pub clipped_samples: usize,
}

/// Speech level normalizer
///
/// # Example
///
/// ```ignore
/// use sv56_level::Normalizer;
///
/// let outcome = Normalizer::new(-26.0).normalize(&buffer)?;
/// println!("Output: {}", outcome.report);
/// if outcome.clipped_samples > 0 {
///     println!("{} samples clipped", outcome.clipped_samples);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    voltmeter: VoltmeterConfig,
    calculator: GainCalculator,
}

impl Normalizer {
    /// Create a normalizer to an active speech level in dB
    pub fn new(target_db: f64) -> Self {
        Self {
            voltmeter: VoltmeterConfig::default(),
            calculator: GainCalculator::new(target_db),
        }
    }

    /// Create a normalizer from configuration
    pub fn from_config(config: &Sv56Config) -> Self {
        Self {
            voltmeter: config.voltmeter.clone(),
            calculator: GainCalculator::from_settings(&config.normalization),
        }
    }

    /// Use a different reference level
    pub fn with_reference(mut self, reference: GainReference) -> Self {
        self.calculator = GainCalculator::with_reference(self.calculator.target_db(), reference);
        self
    }

    /// Use custom voltmeter constants for both measurements
    pub fn with_voltmeter(mut self, voltmeter: VoltmeterConfig) -> Self {
        self.voltmeter = voltmeter;
        self
    }

    /// Target level in dB
    pub fn target_db(&self) -> f64 {
        self.calculator.target_db()
    }

    /// Normalize a buffer
    ///
    /// # Errors
    /// - `EmptyInput` for a zero-length buffer
    /// - `SilentInput` if no active speech was found
    /// - `InvalidTarget` if the target cannot be reached
    pub fn normalize(&self, buffer: &SignalBuffer) -> Result<NormalizationOutcome> {
        let input_report = measure_with_config(buffer, &self.voltmeter)?;
        let gain = self.calculator.calculate(&input_report)?;

        let (output, clipped_samples) = apply_gain(buffer, gain.gain);
        if clipped_samples > 0 {
            warn!(
                "Gain of {:+.2} dB saturated {} samples; max gain without clipping is {:+.2} dB",
                gain.gain_db, clipped_samples, gain.max_safe_gain_db
            );
        }

        let report = measure_with_config(&output, &self.voltmeter)?;
        debug!(
            "Normalized {} samples: active level {:.3} dB -> {:.3} dB (target {:.2} dB)",
            report.samples,
            input_report.active_speech_level_db,
            report.active_speech_level_db,
            gain.target_db
        );

        Ok(NormalizationOutcome {
            buffer: output,
            report,
            input_report,
            gain,
            clipped_samples,
        })
    }
}

/// Scale every sample into a new buffer, saturating at the buffer format's
/// representable range. Returns the buffer and the number of saturated samples.
pub fn apply_gain(buffer: &SignalBuffer, gain: f64) -> (SignalBuffer, usize) {
    let format = buffer.format();
    let mut clipped = 0;
    let samples = buffer
        .samples()
        .iter()
        .map(|&s| {
            let (stored, saturated) = format.saturate(s as f64 * gain);
            clipped += usize::from(saturated);
            stored
        })
        .collect();
    (buffer.derive(samples, buffer.sample_rate()), clipped)
}

/// Normalize a buffer's active speech level to `target_db`
pub fn normalize(buffer: &SignalBuffer, target_db: f64) -> Result<NormalizationOutcome> {
    Normalizer::new(target_db).normalize(buffer)
}
