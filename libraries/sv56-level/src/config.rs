//! Measurement and normalization settings
//!
//! Defaults are the ITU-T P.56 constants. Settings can be loaded from an
//! optional TOML file overlaid with `SV56_`-prefixed environment variables,
//! e.g. `SV56_NORMALIZATION__TARGET_DB=-30`.

use crate::error::{Result, Sv56Error};
use crate::{
    DEFAULT_DC_TIME_CONSTANT_SECS, DEFAULT_HANGOVER_SECS, DEFAULT_MARGIN_DB, DEFAULT_TARGET_DB,
    DEFAULT_TIME_CONSTANT_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Sv56Config {
    /// Speech voltmeter constants
    #[serde(default)]
    pub voltmeter: VoltmeterConfig,

    /// Normalization target
    #[serde(default)]
    pub normalization: NormalizationSettings,
}

/// Speech voltmeter constants
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VoltmeterConfig {
    /// Envelope smoothing time constant in seconds
    #[serde(default = "default_time_constant")]
    pub time_constant_secs: f64,

    /// Hangover time in seconds
    #[serde(default = "default_hangover")]
    pub hangover_secs: f64,

    /// Margin in dB between a threshold and the active level it brackets
    #[serde(default = "default_margin")]
    pub margin_db: f64,

    /// Track and subtract DC before envelope detection
    #[serde(default = "default_remove_dc")]
    pub remove_dc: bool,

    /// Time constant of the running DC estimate in seconds
    #[serde(default = "default_dc_time_constant")]
    pub dc_time_constant_secs: f64,
}

/// Level the normalization gain is computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GainReference {
    /// P.56 active speech level
    #[default]
    Active,
    /// Long-term RMS level of the whole buffer
    LongTerm,
}

impl GainReference {
    /// Name used in settings files and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::LongTerm => "long_term",
        }
    }
}

/// Normalization target
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NormalizationSettings {
    /// Target level in dB relative to the buffer's reference
    #[serde(default = "default_target")]
    pub target_db: f64,

    /// Level the target is compared against
    #[serde(default)]
    pub reference: GainReference,
}

impl Default for VoltmeterConfig {
    fn default() -> Self {
        Self {
            time_constant_secs: default_time_constant(),
            hangover_secs: default_hangover(),
            margin_db: default_margin(),
            remove_dc: default_remove_dc(),
            dc_time_constant_secs: default_dc_time_constant(),
        }
    }
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        Self {
            target_db: default_target(),
            reference: GainReference::Active,
        }
    }
}

impl VoltmeterConfig {
    /// Envelope smoothing coefficient for the given sample rate
    pub fn smoothing_coefficient(&self, sample_rate: u32) -> f64 {
        (-1.0 / (sample_rate as f64 * self.time_constant_secs)).exp()
    }

    /// DC tracking coefficient for the given sample rate
    pub fn dc_coefficient(&self, sample_rate: u32) -> f64 {
        (-1.0 / (sample_rate as f64 * self.dc_time_constant_secs)).exp()
    }

    /// Hangover length in samples for the given sample rate
    pub fn hangover_samples(&self, sample_rate: u32) -> u64 {
        (self.hangover_secs * sample_rate as f64 + 0.5).floor() as u64
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.time_constant_secs.is_finite() && self.time_constant_secs > 0.0) {
            return Err(Sv56Error::InvalidConfig(format!(
                "time_constant_secs must be positive, got {}",
                self.time_constant_secs
            )));
        }
        if !(self.hangover_secs.is_finite() && self.hangover_secs >= 0.0) {
            return Err(Sv56Error::InvalidConfig(format!(
                "hangover_secs must not be negative, got {}",
                self.hangover_secs
            )));
        }
        if !(self.margin_db.is_finite() && self.margin_db > 0.0) {
            return Err(Sv56Error::InvalidConfig(format!(
                "margin_db must be positive, got {}",
                self.margin_db
            )));
        }
        if !(self.dc_time_constant_secs.is_finite() && self.dc_time_constant_secs > 0.0) {
            return Err(Sv56Error::InvalidConfig(format!(
                "dc_time_constant_secs must be positive, got {}",
                self.dc_time_constant_secs
            )));
        }
        Ok(())
    }
}

impl Sv56Config {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path));
        }

        // Override with environment variables (prefixed with SV56_)
        settings = settings.add_source(
            config::Environment::with_prefix("SV56")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.voltmeter.validate()?;
        if !self.normalization.target_db.is_finite() {
            return Err(Sv56Error::InvalidConfig(format!(
                "target_db must be finite, got {}",
                self.normalization.target_db
            )));
        }
        Ok(())
    }
}

// Default values
fn default_time_constant() -> f64 {
    DEFAULT_TIME_CONSTANT_SECS
}

fn default_hangover() -> f64 {
    DEFAULT_HANGOVER_SECS
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN_DB
}

fn default_remove_dc() -> bool {
    true
}

fn default_dc_time_constant() -> f64 {
    DEFAULT_DC_TIME_CONSTANT_SECS
}

fn default_target() -> f64 {
    DEFAULT_TARGET_DB
}
