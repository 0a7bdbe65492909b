//! Equalization gain from a level report
//!
//! # Gain Calculation
//!
//! - Gain (dB) = Target Level - Active Speech Level
//! - Gain (linear) = 10^(Gain dB / 20)
//!
//! With [`GainReference::LongTerm`] the long-term RMS level replaces the
//! active speech level.

use crate::config::{GainReference, NormalizationSettings};
use crate::error::{Result, Sv56Error};
use crate::report::LevelReport;
use crate::{LEVEL_FLOOR_DB, MAX_TARGET_DBFS};
use tracing::debug;

/// Gain that takes a measured level to a target level
#[derive(Debug, Clone, PartialEq)]
pub struct GainResult {
    /// Linear multiplier
    pub gain: f64,
    /// Gain in dB
    pub gain_db: f64,
    /// Requested level in dB
    pub target_db: f64,
    /// Measured level the gain was computed from
    pub reference_level_db: f64,
    /// Which measured level was used
    pub reference: GainReference,
    /// Largest gain in dB that keeps the measured peak within full scale
    pub max_safe_gain_db: f64,
}

impl GainResult {
    /// Check if applying this gain would saturate the peak sample
    pub fn will_clip(&self) -> bool {
        self.gain_db > self.max_safe_gain_db
    }

    /// Get the safe gain (limited to prevent clipping)
    pub fn safe_gain_db(&self) -> f64 {
        self.gain_db.min(self.max_safe_gain_db)
    }

    /// Convert safe gain to linear multiplier
    pub fn safe_linear_gain(&self) -> f64 {
        10.0_f64.powf(self.safe_gain_db() / 20.0)
    }
}

/// Calculator for equalization gains
///
/// # Example
///
/// ```ignore
/// use sv56_level::{measure, GainCalculator};
///
/// let report = measure(&buffer)?;
/// let gain = GainCalculator::new(-26.0).calculate(&report)?;
/// println!("Gain: {:.3} ({:+.2} dB)", gain.gain, gain.gain_db);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GainCalculator {
    target_db: f64,
    reference: GainReference,
}

impl GainCalculator {
    /// Create a calculator targeting an active speech level
    pub fn new(target_db: f64) -> Self {
        Self::with_reference(target_db, GainReference::Active)
    }

    /// Create a calculator with an explicit reference level
    pub fn with_reference(target_db: f64, reference: GainReference) -> Self {
        Self {
            target_db,
            reference,
        }
    }

    /// Create a calculator from normalization settings
    pub fn from_settings(settings: &NormalizationSettings) -> Self {
        Self::with_reference(settings.target_db, settings.reference)
    }

    /// Target level in dB
    pub fn target_db(&self) -> f64 {
        self.target_db
    }

    /// Reference level kind
    pub fn reference(&self) -> GainReference {
        self.reference
    }

    /// Calculate the gain for a report
    ///
    /// # Errors
    /// - `InvalidTarget` if the target is not finite, lies outside
    ///   -100..=0 dB re full scale, or needs a gain that is not representable
    /// - `SilentInput` if the reference level could not be measured
    pub fn calculate(&self, report: &LevelReport) -> Result<GainResult> {
        let target_dbfs = self.target_db + report.ref_db;
        if !self.target_db.is_finite() || !(LEVEL_FLOOR_DB..=MAX_TARGET_DBFS).contains(&target_dbfs)
        {
            return Err(Sv56Error::InvalidTarget(self.target_db));
        }

        let reference_level_db = match self.reference {
            GainReference::Active => {
                if report.is_silent() {
                    return Err(Sv56Error::SilentInput);
                }
                report.active_speech_level_db
            }
            GainReference::LongTerm => {
                if report.rms_db + report.ref_db <= LEVEL_FLOOR_DB {
                    return Err(Sv56Error::SilentInput);
                }
                report.rms_db
            }
        };

        let gain_db = self.target_db - reference_level_db;
        let gain = 10.0_f64.powf(gain_db / 20.0);
        if !gain.is_finite() {
            return Err(Sv56Error::InvalidTarget(self.target_db));
        }

        debug!(
            "Gain to reach {:.2} dB from {:.3} dB ({}): {:.5} ({:+.3} dB)",
            self.target_db,
            reference_level_db,
            self.reference.as_str(),
            gain,
            gain_db
        );

        Ok(GainResult {
            gain,
            gain_db,
            target_db: self.target_db,
            reference_level_db,
            reference: self.reference,
            max_safe_gain_db: report.max_safe_gain_db(),
        })
    }
}
