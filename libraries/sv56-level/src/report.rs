//! Level report produced by the speech voltmeter

use serde::{Deserialize, Serialize};
use std::fmt;

/// Convert a power ratio to dB, clamped to the floor
pub(crate) fn power_to_db(power: f64) -> f64 {
    if power > 0.0 {
        (10.0 * power.log10()).max(crate::LEVEL_FLOOR_DB)
    } else {
        crate::LEVEL_FLOOR_DB
    }
}

/// Convert an amplitude ratio to dB, clamped to the floor
pub(crate) fn amplitude_to_db(amplitude: f64) -> f64 {
    power_to_db(amplitude * amplitude)
}

/// Level statistics of one analyzed buffer
///
/// All levels are in dB relative to the buffer's reference (`ref_db`), so a
/// full-scale level is `-ref_db`. Sample values (`max_positive`,
/// `max_negative`, `dc_level`) are normalized to full scale 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelReport {
    /// Number of samples analyzed
    pub samples: usize,

    /// Sample rate of the analyzed signal
    pub sample_rate: u32,

    /// Reference the levels are expressed against
    pub ref_db: f64,

    /// Long-term RMS level over every sample
    pub rms_db: f64,

    /// ITU-T P.56 active speech level
    pub active_speech_level_db: f64,

    /// Percentage of samples classified active (0-100)
    pub activity_factor: f64,

    /// Largest sample value
    pub max_positive: f64,

    /// Smallest sample value
    pub max_negative: f64,

    /// Mean sample value
    pub dc_level: f64,

    /// Peak level minus long-term RMS level
    pub rms_peak_factor_db: f64,

    /// Peak level minus active speech level
    pub active_peak_factor_db: f64,
}

impl LevelReport {
    /// Whether no speech activity was detected
    pub fn is_silent(&self) -> bool {
        self.activity_factor <= 0.0
    }

    /// Largest absolute sample value
    pub fn abs_max(&self) -> f64 {
        self.max_positive.abs().max(self.max_negative.abs())
    }

    /// Peak level in dB relative to the reference
    pub fn peak_db(&self) -> f64 {
        amplitude_to_db(self.abs_max()) - self.ref_db
    }

    /// Duration of the analyzed audio in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples as f64 / self.sample_rate as f64
    }

    /// Check if the audio would clip when applying gain
    pub fn will_clip_at_gain(&self, gain_db: f64) -> bool {
        self.abs_max() * 10.0_f64.powf(gain_db / 20.0) > 1.0
    }

    /// Largest gain in dB that keeps every sample within full scale
    pub fn max_safe_gain_db(&self) -> f64 {
        -amplitude_to_db(self.abs_max())
    }

    /// Highest active speech level reachable without clipping
    pub fn max_target_without_clipping_db(&self) -> f64 {
        self.active_speech_level_db + self.max_safe_gain_db()
    }
}

impl fmt::Display for LevelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Samples: {:5}, ", self.samples)?;
        if self.samples == 0 {
            return write!(
                f,
                "Min: ------ Max: ----- DC: ------- RMSLev[dB]: ------- ActLev[dB]: ------- \
                 %Active: ------ RMSPkF[dB]: ------- ActPkF[dB]: -------"
            );
        }
        write!(
            f,
            "Min: {:8.5}, Max: {:8.5}, DC: {:8.5}, RMSLev[dB]: {:7.3}, ActLev[dB]: {:7.3}, \
             %Active: {:7.3}, RMSPkF[dB]: {:7.3}, ActPkF[dB]: {:7.3}",
            self.max_negative,
            self.max_positive,
            self.dc_level,
            self.rms_db,
            self.active_speech_level_db,
            self.activity_factor,
            self.rms_peak_factor_db,
            self.active_peak_factor_db
        )
    }
}
