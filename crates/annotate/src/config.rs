//! Detection parameters and the empirical acceptance constants.

use ecgann_wavelet::{FilterResource, Wavelet};

use crate::error::AnnotateError;

/// Amplification applied to the QRS-band CWT before the 0–30 Hz removal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QrsFilter {
    /// Spectrum used as is.
    #[default]
    Linear,
    /// Spectrum mapped through `x·|x|/2`, which favours steep ridges.
    Ridge,
}

impl QrsFilter {
    /// Parses `"linear"` or `"ridge"` (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, AnnotateError> {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "ridge" => Ok(Self::Ridge),
            _ => Err(AnnotateError::InvalidConfig {
                field: "qrs_filter".into(),
                reason: format!("unknown filter family {name:?}"),
            }),
        }
    }

    /// Filter bank used for the band removal.
    pub fn resource(&self) -> FilterResource {
        match self {
            Self::Linear => FilterResource::QrsLinear,
            Self::Ridge => FilterResource::QrsRidge,
        }
    }
}

/// Expected T-wave morphology.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TWaveShape {
    /// Single-lobed T wave.
    #[default]
    Normal,
    /// Biphasic T wave.
    Biphasic,
}

impl TWaveShape {
    /// Parses `"normal"` or `"biphasic"` (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, AnnotateError> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "biphasic" => Ok(Self::Biphasic),
            _ => Err(AnnotateError::InvalidConfig {
                field: "t_wave".into(),
                reason: format!("unknown T-wave shape {name:?}"),
            }),
        }
    }

    /// Wavelet used to localize the T wave.
    pub fn wavelet(&self) -> Wavelet {
        match self {
            Self::Normal => Wavelet::Gaussian1,
            Self::Biphasic => Wavelet::Gaussian,
        }
    }
}

/// RR-interval constants of the ectopic-beat rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EctopicRules {
    short_ratio: f64,
    pair_tolerance: f64,
    short_interval: f64,
    pause_ratio: f64,
}

impl EctopicRules {
    /// Creates the rule set with defaults 1.15, 0.3 s, 0.8 s and 2.4.
    pub fn new() -> Self {
        Self {
            short_ratio: 1.15,
            pair_tolerance: 0.3,
            short_interval: 0.8,
            pause_ratio: 2.4,
        }
    }

    /// Sets how much longer both neighbours must be than a short central RR.
    pub fn with_short_ratio(mut self, ratio: f64) -> Self {
        self.short_ratio = ratio;
        self
    }

    /// Sets the maximum difference (s) between the two paired short RRs.
    pub fn with_pair_tolerance(mut self, seconds: f64) -> Self {
        self.pair_tolerance = seconds;
        self
    }

    /// Sets the length (s) below which an RR counts as short.
    pub fn with_short_interval(mut self, seconds: f64) -> Self {
        self.short_interval = seconds;
        self
    }

    /// Sets the pause factor relative to the sum of the paired short RRs.
    pub fn with_pause_ratio(mut self, ratio: f64) -> Self {
        self.pause_ratio = ratio;
        self
    }

    /// Returns the short-central-RR ratio.
    pub fn short_ratio(&self) -> f64 {
        self.short_ratio
    }

    /// Returns the paired-RR tolerance in seconds.
    pub fn pair_tolerance(&self) -> f64 {
        self.pair_tolerance
    }

    /// Returns the short-RR limit in seconds.
    pub fn short_interval(&self) -> f64 {
        self.short_interval
    }

    /// Returns the pause factor.
    pub fn pause_ratio(&self) -> f64 {
        self.pause_ratio
    }

    fn validate(&self) -> Result<(), AnnotateError> {
        positive("ectopic.short_ratio", self.short_ratio)?;
        positive("ectopic.pair_tolerance", self.pair_tolerance)?;
        positive("ectopic.short_interval", self.short_interval)?;
        positive("ectopic.pause_ratio", self.pause_ratio)
    }
}

impl Default for EctopicRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceptance constants of the P/T wave and sub-peak searches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveRules {
    symmetry: f64,
    pt_separation: f64,
    min_t_duration: f64,
    min_p_duration: f64,
    max_p_duration: f64,
    large_peak: f64,
    small_peak: f64,
    bpm_headroom: f64,
}

impl WaveRules {
    /// Creates the rule set with its defaults.
    ///
    /// Defaults: symmetry 0.4, P/T separation 0.04 s, T duration ≥ 0.09 s,
    /// P duration 0.03–0.15 s, large peak 0.5 mV, small-peak prominence
    /// 0.05 mV, 20 bpm headroom below the maximum rate.
    pub fn new() -> Self {
        Self {
            symmetry: 0.4,
            pt_separation: 0.04,
            min_t_duration: 0.09,
            min_p_duration: 0.03,
            max_p_duration: 0.15,
            large_peak: 0.5,
            small_peak: 0.05,
            bpm_headroom: 20.0,
        }
    }

    /// Sets the minimum ratio of the shorter to the longer half-wave.
    pub fn with_symmetry(mut self, ratio: f64) -> Self {
        self.symmetry = ratio;
        self
    }

    /// Sets the clearance (s) kept between a T offset and the P window.
    pub fn with_pt_separation(mut self, seconds: f64) -> Self {
        self.pt_separation = seconds;
        self
    }

    /// Sets the minimum T-wave duration (s).
    pub fn with_min_t_duration(mut self, seconds: f64) -> Self {
        self.min_t_duration = seconds;
        self
    }

    /// Sets the P-wave duration bounds (s).
    pub fn with_p_duration(mut self, min: f64, max: f64) -> Self {
        self.min_p_duration = min;
        self.max_p_duration = max;
        self
    }

    /// Sets the amplitude (mV) above which sub-peaks are upper case.
    pub fn with_large_peak(mut self, mv: f64) -> Self {
        self.large_peak = mv;
        self
    }

    /// Sets the prominence (mV) required of a small q, r or s.
    pub fn with_small_peak(mut self, mv: f64) -> Self {
        self.small_peak = mv;
        self
    }

    /// Sets the bpm headroom below the maximum rate for wave search.
    pub fn with_bpm_headroom(mut self, bpm: f64) -> Self {
        self.bpm_headroom = bpm;
        self
    }

    /// Returns the symmetry ratio.
    pub fn symmetry(&self) -> f64 {
        self.symmetry
    }

    /// Returns the P/T separation in seconds.
    pub fn pt_separation(&self) -> f64 {
        self.pt_separation
    }

    /// Returns the minimum T duration in seconds.
    pub fn min_t_duration(&self) -> f64 {
        self.min_t_duration
    }

    /// Returns the minimum P duration in seconds.
    pub fn min_p_duration(&self) -> f64 {
        self.min_p_duration
    }

    /// Returns the maximum P duration in seconds.
    pub fn max_p_duration(&self) -> f64 {
        self.max_p_duration
    }

    /// Returns the large-peak amplitude in mV.
    pub fn large_peak(&self) -> f64 {
        self.large_peak
    }

    /// Returns the small-peak prominence in mV.
    pub fn small_peak(&self) -> f64 {
        self.small_peak
    }

    /// Returns the wave-search bpm headroom.
    pub fn bpm_headroom(&self) -> f64 {
        self.bpm_headroom
    }

    fn validate(&self) -> Result<(), AnnotateError> {
        if !(self.symmetry.is_finite() && (0.0..=1.0).contains(&self.symmetry)) {
            return Err(invalid(
                "waves.symmetry",
                format!("must be in [0, 1], got {}", self.symmetry),
            ));
        }
        non_negative("waves.pt_separation", self.pt_separation)?;
        non_negative("waves.min_t_duration", self.min_t_duration)?;
        non_negative("waves.min_p_duration", self.min_p_duration)?;
        ordered(
            "waves.max_p_duration",
            self.min_p_duration,
            self.max_p_duration,
        )?;
        non_negative("waves.large_peak", self.large_peak)?;
        non_negative("waves.small_peak", self.small_peak)?;
        non_negative("waves.bpm_headroom", self.bpm_headroom)
    }
}

impl Default for WaveRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of one annotation session.
///
/// # Example
///
/// ```
/// use ecgann_annotate::{DetectionConfig, QrsFilter};
///
/// let config = DetectionConfig::new()
///     .with_bpm_range(30.0, 180.0)
///     .with_qrs_filter(QrsFilter::Ridge);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionConfig {
    min_bpm: f64,
    max_bpm: f64,
    min_qrs: f64,
    max_qrs: f64,
    qrs_frequency: f64,
    qrs_filter: QrsFilter,
    min_amplitude: f64,
    min_pq: f64,
    max_pq: f64,
    min_qt: f64,
    max_qt: f64,
    p_frequency: f64,
    t_frequency: f64,
    t_wave: TWaveShape,
    ectopic: EctopicRules,
    waves: WaveRules,
}

impl DetectionConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: 40–200 bpm, QRS 0.04–0.20 s filtered at 13 Hz (linear),
    /// R/S amplitude ≥ 0.2 mV, PQ 0.07–0.20 s, QT 0.21–0.48 s, P at 9 Hz,
    /// T at 3 Hz, normal T waves.
    pub fn new() -> Self {
        Self {
            min_bpm: 40.0,
            max_bpm: 200.0,
            min_qrs: 0.04,
            max_qrs: 0.20,
            qrs_frequency: 13.0,
            qrs_filter: QrsFilter::Linear,
            min_amplitude: 0.2,
            min_pq: 0.07,
            max_pq: 0.20,
            min_qt: 0.21,
            max_qt: 0.48,
            p_frequency: 9.0,
            t_frequency: 3.0,
            t_wave: TWaveShape::Normal,
            ectopic: EctopicRules::new(),
            waves: WaveRules::new(),
        }
    }

    /// Sets the heart-rate bounds in bpm.
    pub fn with_bpm_range(mut self, min: f64, max: f64) -> Self {
        self.min_bpm = min;
        self.max_bpm = max;
        self
    }

    /// Sets the QRS duration bounds in seconds.
    pub fn with_qrs_duration(mut self, min: f64, max: f64) -> Self {
        self.min_qrs = min;
        self.max_qrs = max;
        self
    }

    /// Sets the QRS-band CWT frequency in Hz.
    pub fn with_qrs_frequency(mut self, hz: f64) -> Self {
        self.qrs_frequency = hz;
        self
    }

    /// Sets the QRS amplification family.
    pub fn with_qrs_filter(mut self, filter: QrsFilter) -> Self {
        self.qrs_filter = filter;
        self
    }

    /// Sets the minimum R/S amplitude in mV.
    pub fn with_min_amplitude(mut self, mv: f64) -> Self {
        self.min_amplitude = mv;
        self
    }

    /// Sets the PQ interval bounds in seconds.
    pub fn with_pq_range(mut self, min: f64, max: f64) -> Self {
        self.min_pq = min;
        self.max_pq = max;
        self
    }

    /// Sets the QT interval bounds in seconds.
    pub fn with_qt_range(mut self, min: f64, max: f64) -> Self {
        self.min_qt = min;
        self.max_qt = max;
        self
    }

    /// Sets the P-wave CWT frequency in Hz.
    pub fn with_p_frequency(mut self, hz: f64) -> Self {
        self.p_frequency = hz;
        self
    }

    /// Sets the T-wave CWT frequency in Hz.
    pub fn with_t_frequency(mut self, hz: f64) -> Self {
        self.t_frequency = hz;
        self
    }

    /// Sets the expected T-wave morphology.
    pub fn with_t_wave(mut self, shape: TWaveShape) -> Self {
        self.t_wave = shape;
        self
    }

    /// Replaces the ectopic-beat constants.
    pub fn with_ectopic_rules(mut self, rules: EctopicRules) -> Self {
        self.ectopic = rules;
        self
    }

    /// Replaces the wave acceptance constants.
    pub fn with_wave_rules(mut self, rules: WaveRules) -> Self {
        self.waves = rules;
        self
    }

    // --- Accessors ---

    /// Returns the minimum heart rate in bpm.
    pub fn min_bpm(&self) -> f64 {
        self.min_bpm
    }

    /// Returns the maximum heart rate in bpm.
    pub fn max_bpm(&self) -> f64 {
        self.max_bpm
    }

    /// Returns the minimum QRS duration in seconds.
    pub fn min_qrs(&self) -> f64 {
        self.min_qrs
    }

    /// Returns the maximum QRS duration in seconds.
    pub fn max_qrs(&self) -> f64 {
        self.max_qrs
    }

    /// Returns the QRS-band CWT frequency in Hz.
    pub fn qrs_frequency(&self) -> f64 {
        self.qrs_frequency
    }

    /// Returns the QRS amplification family.
    pub fn qrs_filter(&self) -> QrsFilter {
        self.qrs_filter
    }

    /// Returns the minimum R/S amplitude in mV.
    pub fn min_amplitude(&self) -> f64 {
        self.min_amplitude
    }

    /// Returns the minimum PQ interval in seconds.
    pub fn min_pq(&self) -> f64 {
        self.min_pq
    }

    /// Returns the maximum PQ interval in seconds.
    pub fn max_pq(&self) -> f64 {
        self.max_pq
    }

    /// Returns the minimum QT interval in seconds.
    pub fn min_qt(&self) -> f64 {
        self.min_qt
    }

    /// Returns the maximum QT interval in seconds.
    pub fn max_qt(&self) -> f64 {
        self.max_qt
    }

    /// Returns the P-wave CWT frequency in Hz.
    pub fn p_frequency(&self) -> f64 {
        self.p_frequency
    }

    /// Returns the T-wave CWT frequency in Hz.
    pub fn t_frequency(&self) -> f64 {
        self.t_frequency
    }

    /// Returns the expected T-wave morphology.
    pub fn t_wave(&self) -> TWaveShape {
        self.t_wave
    }

    /// Returns the ectopic-beat constants.
    pub fn ectopic_rules(&self) -> &EctopicRules {
        &self.ectopic
    }

    /// Returns the wave acceptance constants.
    pub fn wave_rules(&self) -> &WaveRules {
        &self.waves
    }

    /// Validates this configuration.
    ///
    /// Every rate, duration and frequency must be finite and positive, each
    /// lower bound must lie below its upper bound, and the rule constants
    /// must be in range.
    pub fn validate(&self) -> Result<(), AnnotateError> {
        positive("min_bpm", self.min_bpm)?;
        ordered("max_bpm", self.min_bpm, self.max_bpm)?;
        positive("min_qrs", self.min_qrs)?;
        ordered("max_qrs", self.min_qrs, self.max_qrs)?;
        positive("qrs_frequency", self.qrs_frequency)?;
        non_negative("min_amplitude", self.min_amplitude)?;
        positive("min_pq", self.min_pq)?;
        ordered("max_pq", self.min_pq, self.max_pq)?;
        positive("min_qt", self.min_qt)?;
        ordered("max_qt", self.min_qt, self.max_qt)?;
        positive("p_frequency", self.p_frequency)?;
        positive("t_frequency", self.t_frequency)?;
        self.ectopic.validate()?;
        self.waves.validate()
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(field: &str, reason: String) -> AnnotateError {
    AnnotateError::InvalidConfig {
        field: field.into(),
        reason,
    }
}

fn positive(field: &str, value: f64) -> Result<(), AnnotateError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and positive, got {value}")))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), AnnotateError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("must be finite and non-negative, got {value}"),
        ))
    }
}

fn ordered(field: &str, lower: f64, upper: f64) -> Result<(), AnnotateError> {
    if upper.is_finite() && upper > lower {
        Ok(())
    } else {
        Err(invalid(field, format!("must exceed {lower}, got {upper}")))
    }
}
