//! ITU-T P.56 speech voltmeter (method B)
//!
//! A single causal pass over the signal drives:
//! - a two-stage exponential envelope of the sample magnitude (30 ms)
//! - a bank of 15 activity thresholds spaced 6.02 dB apart, from -90.3 dBFS
//!   up to -6.02 dBFS, each with its own 200 ms hangover
//! - long-term sums for the RMS level, DC level and sample peaks
//!
//! Speech statistics use DC-corrected samples. [`measure`] subtracts the
//! exact mean of the buffer, found in a first pass. The incremental
//! [`LevelAnalyzer`] cannot see ahead, so unless it is given the offset with
//! [`LevelAnalyzer::with_dc_offset`] it follows a leaky running mean, which
//! lags the true offset during the first seconds of a signal.
//!
//! After the pass, the active speech level is the level at which the energy
//! of the samples classified active sits exactly `margin_db` (15.9 dB) above
//! the threshold that classified them. It is found between the first two
//! thresholds that bracket that margin by interpolating in the dB domain.

use crate::config::VoltmeterConfig;
use crate::error::{Result, Sv56Error};
use crate::report::{amplitude_to_db, power_to_db, LevelReport};
use crate::signal::SignalBuffer;
use crate::{LEVEL_FLOOR_DB, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, THRESHOLD_COUNT};
use tracing::{debug, trace};

/// One activity threshold with its hangover and accumulators
#[derive(Debug, Clone, Copy, PartialEq)]
struct ThresholdTrack {
    /// Threshold on the envelope, linear (full scale 1.0)
    threshold: f64,
    /// Samples classified active
    active_count: u64,
    /// Sum of squares of the samples classified active
    active_energy: f64,
    /// Samples left before the track falls inactive
    hangover: u64,
}

impl ThresholdTrack {
    fn new(threshold: f64) -> Self {
        Self {
            threshold,
            active_count: 0,
            active_energy: 0.0,
            hangover: 0,
        }
    }

    fn update(&mut self, envelope: f64, energy: f64, hangover_len: u64) {
        if envelope >= self.threshold {
            self.hangover = hangover_len;
        } else if self.hangover > 0 {
            self.hangover -= 1;
        } else {
            return;
        }
        self.active_count += 1;
        self.active_energy += energy;
    }

    fn threshold_db(&self) -> f64 {
        20.0 * self.threshold.log10()
    }

    fn level_db(&self) -> Option<f64> {
        (self.active_count > 0).then(|| power_to_db(self.active_energy / self.active_count as f64))
    }
}

/// Thresholds 2^-15 .. 2^-1, lowest first
fn threshold_bank() -> [ThresholdTrack; THRESHOLD_COUNT] {
    std::array::from_fn(|j| ThresholdTrack::new(0.5_f64.powi((THRESHOLD_COUNT - j) as i32)))
}

/// A threshold's measured level paired with the threshold itself
#[derive(Debug, Clone, Copy)]
struct Candidate {
    level_db: f64,
    threshold_db: f64,
    active_count: f64,
}

impl Candidate {
    fn from_track(track: &ThresholdTrack) -> Option<Self> {
        Some(Self {
            level_db: track.level_db()?,
            threshold_db: track.threshold_db(),
            active_count: track.active_count as f64,
        })
    }

    fn excess_db(&self) -> f64 {
        self.level_db - self.threshold_db
    }
}

/// Converged active level (dB re full scale) and interpolated active count
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveLevel {
    level_db: f64,
    active_samples: f64,
}

impl From<Candidate> for ActiveLevel {
    fn from(c: Candidate) -> Self {
        Self {
            level_db: c.level_db,
            active_samples: c.active_count,
        }
    }
}

/// Find the active speech level from the threshold bank.
///
/// Walks the thresholds upward until the level of the active samples is no
/// more than `margin_db` above its threshold. Returns `None` if nothing was
/// active at the lowest threshold.
fn resolve_active_level(tracks: &[ThresholdTrack], margin_db: f64) -> Option<ActiveLevel> {
    let mut lower: Option<Candidate> = None;

    for track in tracks {
        let Some(upper) = Candidate::from_track(track) else {
            // Nothing reached this threshold: the last populated one stands
            return lower.map(ActiveLevel::from);
        };

        if upper.excess_db() <= margin_db {
            let Some(lower) = lower else {
                return Some(upper.into());
            };
            // excess(lower) > margin >= excess(upper); solve for the crossing
            let t = ((lower.excess_db() - margin_db) / (lower.excess_db() - upper.excess_db()))
                .clamp(0.0, 1.0);
            return Some(ActiveLevel {
                level_db: lower.level_db + t * (upper.level_db - lower.level_db),
                active_samples: lower.active_count + t * (upper.active_count - lower.active_count),
            });
        }

        lower = Some(upper);
    }

    lower.map(ActiveLevel::from)
}

/// Running state of one analysis pass
#[derive(Debug, Clone)]
struct AnalyzerState {
    /// First envelope stage
    p: f64,
    /// Second envelope stage, compared against the thresholds
    q: f64,
    /// Running DC estimate
    dc: f64,
    /// Sum of samples
    sum: f64,
    /// Sum of squared samples
    sum_squares: f64,
    abs_max: f64,
    max_positive: f64,
    max_negative: f64,
    samples: u64,
    tracks: [ThresholdTrack; THRESHOLD_COUNT],
}

impl AnalyzerState {
    fn new() -> Self {
        Self {
            p: 0.0,
            q: 0.0,
            dc: 0.0,
            sum: 0.0,
            sum_squares: 0.0,
            abs_max: 0.0,
            max_positive: f64::NEG_INFINITY,
            max_negative: f64::INFINITY,
            samples: 0,
            tracks: threshold_bank(),
        }
    }
}

/// P.56 active speech level analyzer
///
/// Samples may be fed in blocks of any size; the result only depends on the
/// concatenated sequence.
///
/// DC removal tracks the offset with a running mean (time constant
/// `dc_time_constant_secs`). It starts from zero, so on short signals with a
/// large offset the active level reads high. Pass the offset with
/// [`with_dc_offset`](Self::with_dc_offset) when it is known up front.
///
/// # Example
///
/// ```
/// use sv56_level::LevelAnalyzer;
///
/// let mut analyzer = LevelAnalyzer::new(16000, 0.0)?;
/// let tone: Vec<f32> = (0..16000)
///     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 16000.0).sin())
///     .collect();
/// analyzer.add_samples(&tone);
///
/// let report = analyzer.finalize()?;
/// assert!((report.rms_db + 9.03).abs() < 0.1);
/// # Ok::<(), sv56_level::Sv56Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LevelAnalyzer {
    config: VoltmeterConfig,
    sample_rate: u32,
    ref_db: f64,
    /// Envelope smoothing coefficient
    smoothing: f64,
    dc_coefficient: f64,
    /// Fixed offset replacing the running DC estimate
    dc_offset: Option<f64>,
    hangover_len: u64,
    state: AnalyzerState,
}

impl LevelAnalyzer {
    /// Create an analyzer with the standard P.56 constants
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz (8000-384000)
    /// * `ref_db` - Level reference subtracted from every reported level
    pub fn new(sample_rate: u32, ref_db: f64) -> Result<Self> {
        Self::with_config(sample_rate, ref_db, VoltmeterConfig::default())
    }

    /// Create an analyzer with custom constants
    pub fn with_config(sample_rate: u32, ref_db: f64, config: VoltmeterConfig) -> Result<Self> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(Sv56Error::InvalidSampleRate(sample_rate));
        }
        config.validate()?;

        Ok(Self {
            smoothing: config.smoothing_coefficient(sample_rate),
            dc_coefficient: config.dc_coefficient(sample_rate),
            dc_offset: None,
            hangover_len: config.hangover_samples(sample_rate),
            config,
            sample_rate,
            ref_db,
            state: AnalyzerState::new(),
        })
    }

    /// Subtract a known DC offset instead of estimating it as samples arrive
    ///
    /// Has no effect when `remove_dc` is off. Kept across [`reset`](Self::reset).
    pub fn with_dc_offset(mut self, offset: f64) -> Self {
        self.dc_offset = Some(offset);
        self
    }

    /// Feed normalized samples (full scale 1.0)
    pub fn add_samples(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.process_sample(sample as f64);
        }
        trace!(
            "Voltmeter block of {} samples ({} total)",
            samples.len(),
            self.state.samples
        );
    }

    /// Feed 16-bit PCM samples
    pub fn add_samples_i16(&mut self, samples: &[i16]) {
        for &sample in samples {
            self.process_sample(sample as f64 / 32768.0);
        }
        trace!(
            "Voltmeter block of {} samples ({} total)",
            samples.len(),
            self.state.samples
        );
    }

    fn process_sample(&mut self, x: f64) {
        let state = &mut self.state;

        state.abs_max = state.abs_max.max(x.abs());
        state.max_positive = state.max_positive.max(x);
        state.max_negative = state.max_negative.min(x);

        state.samples += 1;
        state.sum += x;
        state.sum_squares += x * x;

        let centered = if self.config.remove_dc {
            let dc = match self.dc_offset {
                Some(offset) => offset,
                None => {
                    state.dc = self.dc_coefficient * state.dc + (1.0 - self.dc_coefficient) * x;
                    state.dc
                }
            };
            x - dc
        } else {
            x
        };

        let g = self.smoothing;
        state.p = g * state.p + (1.0 - g) * centered.abs();
        state.q = g * state.q + (1.0 - g) * state.p;

        let energy = centered * centered;
        for track in &mut state.tracks {
            track.update(state.q, energy, self.hangover_len);
        }
    }

    /// Get the number of samples processed
    pub fn samples_processed(&self) -> usize {
        self.state.samples as usize
    }

    /// Report for the samples seen so far, or `None` before the first sample
    pub fn current_report(&self) -> Option<LevelReport> {
        let state = &self.state;
        if state.samples == 0 {
            return None;
        }

        let n = state.samples as f64;
        let rms_dbfs = power_to_db(state.sum_squares / n);
        let peak_dbfs = amplitude_to_db(state.abs_max);

        let (active_dbfs, active_samples) =
            match resolve_active_level(&state.tracks, self.config.margin_db) {
                Some(active) => (active.level_db.min(peak_dbfs), active.active_samples),
                None => (LEVEL_FLOOR_DB, 0.0),
            };

        Some(LevelReport {
            samples: state.samples as usize,
            sample_rate: self.sample_rate,
            ref_db: self.ref_db,
            rms_db: rms_dbfs - self.ref_db,
            active_speech_level_db: active_dbfs - self.ref_db,
            activity_factor: (100.0 * active_samples / n).clamp(0.0, 100.0),
            max_positive: state.max_positive,
            max_negative: state.max_negative,
            dc_level: state.sum / n,
            rms_peak_factor_db: peak_dbfs - rms_dbfs,
            active_peak_factor_db: peak_dbfs - active_dbfs,
        })
    }

    /// Finalize analysis and get the level report
    ///
    /// # Errors
    /// Returns `EmptyInput` if no samples were provided
    pub fn finalize(self) -> Result<LevelReport> {
        let report = self.current_report().ok_or(Sv56Error::EmptyInput)?;
        debug!(
            "P.56 analysis: {} samples, RMS {:.3} dB, active level {:.3} dB, activity {:.2}%",
            report.samples, report.rms_db, report.active_speech_level_db, report.activity_factor
        );
        Ok(report)
    }

    /// Reset the analyzer for reuse
    ///
    /// Clears every accumulator; a DC offset given with
    /// [`with_dc_offset`](Self::with_dc_offset) stays in effect.
    pub fn reset(&mut self) {
        self.state = AnalyzerState::new();
    }
}

/// Measure a buffer with the standard P.56 constants
///
/// # Errors
/// Returns `EmptyInput` for a zero-length buffer
pub fn measure(buffer: &SignalBuffer) -> Result<LevelReport> {
    measure_with_config(buffer, &VoltmeterConfig::default())
}

/// Measure a buffer with custom voltmeter constants
///
/// With `remove_dc` set, the exact mean of the buffer is subtracted before the
/// envelope and the active energies are computed.
pub fn measure_with_config(buffer: &SignalBuffer, config: &VoltmeterConfig) -> Result<LevelReport> {
    if buffer.is_empty() {
        return Err(Sv56Error::EmptyInput);
    }
    let mut analyzer =
        LevelAnalyzer::with_config(buffer.sample_rate(), buffer.ref_db(), config.clone())?;
    if config.remove_dc {
        analyzer = analyzer.with_dc_offset(mean(buffer.samples()));
    }
    analyzer.add_samples(buffer.samples());
    analyzer.finalize()
}

fn mean(samples: &[f32]) -> f64 {
    samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(threshold_db: f64, level_db: f64, count: u64) -> ThresholdTrack {
        ThresholdTrack {
            threshold: 10.0_f64.powf(threshold_db / 20.0),
            active_count: count,
            active_energy: 10.0_f64.powf(level_db / 10.0) * count as f64,
            hangover: 0,
        }
    }

    fn sine(amplitude: f32, frequency: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| {
                amplitude
                    * (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_threshold_bank_spacing() {
        let bank = threshold_bank();
        assert!((bank[0].threshold - 2.0_f64.powi(-15)).abs() < 1e-18);
        assert!((bank[THRESHOLD_COUNT - 1].threshold - 0.5).abs() < 1e-15);
        for pair in bank.windows(2) {
            assert!((pair[1].threshold_db() - pair[0].threshold_db() - 6.0206).abs() < 1e-3);
        }
    }

    #[test]
    fn test_hangover_bridges_short_gaps() {
        let mut t = ThresholdTrack::new(0.1);

        t.update(0.2, 1.0, 3);
        assert_eq!(t.active_count, 1);

        // Three samples below threshold stay active, the fourth does not
        for _ in 0..3 {
            t.update(0.0, 0.0, 3);
        }
        assert_eq!(t.active_count, 4);
        t.update(0.0, 0.0, 3);
        assert_eq!(t.active_count, 4);

        // A new crossing re-arms the full hangover
        t.update(0.1, 1.0, 3);
        assert_eq!(t.active_count, 5);
        assert_eq!(t.hangover, 3);
    }

    #[test]
    fn test_no_hangover_at_start() {
        let mut t = ThresholdTrack::new(0.1);
        for _ in 0..10 {
            t.update(0.05, 0.0025, 100);
        }
        assert_eq!(t.active_count, 0);
        assert_eq!(t.level_db(), None);
    }

    #[test]
    fn test_resolve_interpolates_between_brackets() {
        // Excess 20 dB at the lower threshold and 14 dB at the upper one:
        // the 15.9 dB crossing sits at t = (20 - 15.9) / 6
        let tracks = [track(-40.0, -20.0, 1000), track(-34.0, -20.0, 800)];
        let active = resolve_active_level(&tracks, 15.9).unwrap();

        let t = (20.0 - 15.9) / 6.0;
        assert!((active.level_db - (-20.0)).abs() < 1e-9);
        assert!((active.active_samples - (1000.0 - t * 200.0)).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_interpolates_level() {
        let tracks = [track(-40.0, -22.0, 1000), track(-34.0, -19.0, 500)];
        let active = resolve_active_level(&tracks, 15.9).unwrap();

        // excess goes 18 -> 15; crossing at t = 0.7
        assert!((active.level_db - (-22.0 + 0.7 * 3.0)).abs() < 1e-9);
        assert!((active.level_db - (-40.0 + 0.7 * 6.0) - 15.9).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_takes_lowest_qualifying_threshold() {
        let tracks = [
            track(-46.0, -40.0, 100),
            track(-40.0, -30.0, 50),
            track(-34.0, -29.0, 10),
        ];
        // The first threshold already qualifies and has no lower bracket
        let active = resolve_active_level(&tracks, 15.9).unwrap();
        assert!((active.level_db - (-40.0)).abs() < 1e-9);
        assert!((active.active_samples - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_silent_bank() {
        let tracks = threshold_bank();
        assert_eq!(resolve_active_level(&tracks, 15.9), None);
    }

    #[test]
    fn test_resolve_stops_at_empty_threshold() {
        let mut tracks = threshold_bank();
        tracks[0] = track(-90.3, -50.0, 300);
        let active = resolve_active_level(&tracks, 15.9).unwrap();
        assert!((active.level_db - (-50.0)).abs() < 1e-9);
        assert!((active.active_samples - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyzer_creation() {
        assert!(LevelAnalyzer::new(16000, 0.0).is_ok());
        assert!(LevelAnalyzer::new(48000, -3.0).is_ok());

        assert!(matches!(
            LevelAnalyzer::new(100, 0.0),
            Err(Sv56Error::InvalidSampleRate(100))
        ));

        let config = VoltmeterConfig {
            margin_db: 0.0,
            ..VoltmeterConfig::default()
        };
        assert!(matches!(
            LevelAnalyzer::with_config(16000, 0.0, config),
            Err(Sv56Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_no_samples_error() {
        let analyzer = LevelAnalyzer::new(16000, 0.0).unwrap();
        assert!(analyzer.current_report().is_none());
        assert!(matches!(analyzer.finalize(), Err(Sv56Error::EmptyInput)));
    }

    #[test]
    fn test_sine_wave_levels() {
        let mut analyzer = LevelAnalyzer::new(16000, 0.0).unwrap();
        analyzer.add_samples(&sine(0.5, 1000.0, 16000, 1.0));
        let report = analyzer.finalize().unwrap();

        assert_eq!(report.samples, 16000);
        assert!((report.rms_db - (-9.0309)).abs() < 0.05, "rms {}", report.rms_db);
        assert!(
            (report.active_speech_level_db - (-9.03)).abs() < 0.3,
            "active level {}",
            report.active_speech_level_db
        );
        assert!(report.activity_factor > 95.0);
        assert!((report.max_positive - 0.5).abs() < 1e-3);
        assert!((report.max_negative + 0.5).abs() < 1e-3);
        assert!(report.dc_level.abs() < 1e-3);
        assert!((report.rms_peak_factor_db - 3.01).abs() < 0.05);
    }

    #[test]
    fn test_silent_audio() {
        let mut analyzer = LevelAnalyzer::new(16000, 0.0).unwrap();
        analyzer.add_samples(&[0.0; 16000]);
        let report = analyzer.finalize().unwrap();

        assert!(report.is_silent());
        assert_eq!(report.activity_factor, 0.0);
        assert_eq!(report.active_speech_level_db, LEVEL_FLOOR_DB);
        assert_eq!(report.rms_db, LEVEL_FLOOR_DB);
    }

    #[test]
    fn test_reference_shifts_levels() {
        let tone = sine(0.5, 1000.0, 16000, 1.0);

        let mut plain = LevelAnalyzer::new(16000, 0.0).unwrap();
        plain.add_samples(&tone);
        let plain = plain.finalize().unwrap();

        let mut shifted = LevelAnalyzer::new(16000, -10.0).unwrap();
        shifted.add_samples(&tone);
        let shifted = shifted.finalize().unwrap();

        assert!((shifted.rms_db - plain.rms_db - 10.0).abs() < 1e-9);
        assert!((shifted.active_speech_level_db - plain.active_speech_level_db - 10.0).abs() < 1e-9);
        assert!((shifted.activity_factor - plain.activity_factor).abs() < 1e-9);
    }

    #[test]
    fn test_i16_matches_float() {
        let pcm: Vec<i16> = sine(0.25, 440.0, 8000, 0.5)
            .iter()
            .map(|&s| (s * 32768.0) as i16)
            .collect();
        let floats: Vec<f32> = pcm.iter().map(|&s| s as f32 / 32768.0).collect();

        let mut a = LevelAnalyzer::new(8000, 0.0).unwrap();
        a.add_samples_i16(&pcm);
        let mut b = LevelAnalyzer::new(8000, 0.0).unwrap();
        b.add_samples(&floats);

        let (a, b) = (a.finalize().unwrap(), b.finalize().unwrap());
        assert!((a.active_speech_level_db - b.active_speech_level_db).abs() < 1e-6);
        assert!((a.activity_factor - b.activity_factor).abs() < 1e-6);
    }

    fn with_offset(samples: &[f32], offset: f32) -> Vec<f32> {
        samples.iter().map(|s| s + offset).collect()
    }

    #[test]
    fn test_dc_offset_reported_and_removed() {
        let with_dc = with_offset(&sine(0.1, 500.0, 16000, 4.0), 0.05);

        let report = measure(&SignalBuffer::new(with_dc, 16000).unwrap()).unwrap();
        assert!((report.dc_level - 0.05).abs() < 1e-3);
        assert!((report.max_positive - 0.15).abs() < 1e-3);
        assert!((report.max_negative + 0.05).abs() < 1e-3);

        // Long-term RMS includes the offset; the active level is the tone alone
        let tone_only = 20.0 * (0.1_f64 / 2.0_f64.sqrt()).log10();
        assert!(report.rms_db > tone_only + 0.5);
        assert!(
            (report.active_speech_level_db - tone_only).abs() < 0.1,
            "active level {}",
            report.active_speech_level_db
        );
    }

    #[test]
    fn test_dc_offset_removed_from_short_buffers() {
        let tone_only = 20.0 * (0.1_f64 / 2.0_f64.sqrt()).log10();
        let plain = measure(&SignalBuffer::new(sine(0.1, 500.0, 16000, 1.0), 16000).unwrap())
            .unwrap();
        assert!((plain.active_speech_level_db - tone_only).abs() < 0.1);

        for (seconds, offset) in [(1.0, 0.2), (0.5, 0.05), (0.5, 0.2), (0.25, -0.3)] {
            let with_dc = with_offset(&sine(0.1, 500.0, 16000, seconds), offset);
            let report = measure(&SignalBuffer::new(with_dc, 16000).unwrap()).unwrap();

            assert!((report.dc_level - offset as f64).abs() < 1e-4);
            assert!(
                (report.active_speech_level_db - plain.active_speech_level_db).abs() < 0.1,
                "{} s with offset {}: active level {}",
                seconds,
                offset,
                report.active_speech_level_db
            );
        }
    }

    #[test]
    fn test_known_offset_matches_one_shot() {
        let with_dc = with_offset(&sine(0.1, 500.0, 16000, 1.0), 0.2);
        let one_shot = measure(&SignalBuffer::new(with_dc.clone(), 16000).unwrap()).unwrap();

        let mut analyzer = LevelAnalyzer::new(16000, 0.0)
            .unwrap()
            .with_dc_offset(mean(&with_dc));
        for block in with_dc.chunks(160) {
            analyzer.add_samples(block);
        }
        assert_eq!(analyzer.finalize().unwrap(), one_shot);
    }

    #[test]
    fn test_running_dc_estimate_settles() {
        let tone_only = 20.0 * (0.1_f64 / 2.0_f64.sqrt()).log10();
        let with_dc = with_offset(&sine(0.1, 500.0, 16000, 1.0), 0.2);

        // Without the offset up front the early samples keep most of it
        let mut running = LevelAnalyzer::new(16000, 0.0).unwrap();
        running.add_samples(&with_dc);
        let early = running.current_report().unwrap();
        assert!(early.active_speech_level_db > tone_only + 1.0);

        // A longer signal lets the running mean converge
        let mut settled = LevelAnalyzer::new(16000, 0.0).unwrap();
        settled.add_samples(&with_offset(&sine(0.1, 500.0, 16000, 10.0), 0.2));
        let settled = settled.finalize().unwrap();
        assert!(settled.active_speech_level_db < early.active_speech_level_db);
    }

    #[test]
    fn test_offset_ignored_without_dc_removal() {
        let config = VoltmeterConfig {
            remove_dc: false,
            ..VoltmeterConfig::default()
        };
        let tone = sine(0.1, 500.0, 16000, 0.5);

        let mut plain = LevelAnalyzer::with_config(16000, 0.0, config.clone()).unwrap();
        plain.add_samples(&tone);
        let mut offset = LevelAnalyzer::with_config(16000, 0.0, config)
            .unwrap()
            .with_dc_offset(0.3);
        offset.add_samples(&tone);

        assert_eq!(plain.finalize().unwrap(), offset.finalize().unwrap());
    }

    #[test]
    fn test_reset() {
        let mut analyzer = LevelAnalyzer::new(16000, 0.0).unwrap();
        analyzer.add_samples(&sine(0.5, 1000.0, 16000, 0.1));
        assert_eq!(analyzer.samples_processed(), 1600);

        analyzer.reset();
        assert_eq!(analyzer.samples_processed(), 0);
        assert!(analyzer.current_report().is_none());
    }

    #[test]
    fn test_measure_empty_buffer() {
        let buffer = SignalBuffer::new(Vec::new(), 16000).unwrap();
        assert!(matches!(measure(&buffer), Err(Sv56Error::EmptyInput)));
    }
}
