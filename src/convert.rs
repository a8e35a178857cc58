//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::*;

use ecgann_annotate::{DetectionConfig, EctopicRules, QrsFilter, TWaveShape, WaveRules};
use ecgann_wavelet::{Denoiser, FilterDir, Shrinkage, ThresholdRule};

/// Which bands the `denoise` subcommand removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenoiseMode {
    /// Baseline wander only.
    Lf,
    /// High-frequency noise only.
    Hf,
    /// Both, baseline first.
    LfHf,
}

/// Parses a denoise mode name string into the corresponding enum variant.
pub fn parse_denoise_mode(s: &str) -> Result<DenoiseMode> {
    match s.to_lowercase().as_str() {
        "lf" => Ok(DenoiseMode::Lf),
        "hf" => Ok(DenoiseMode::Hf),
        "lfhf" => Ok(DenoiseMode::LfHf),
        other => bail!("unknown denoise mode: {other:?}"),
    }
}

/// Builds [`EctopicRules`] from the TOML rules section.
pub fn build_ectopic_rules(rules: &RulesToml) -> EctopicRules {
    let mut out = EctopicRules::new();
    if let Some(v) = rules.short_ratio {
        out = out.with_short_ratio(v);
    }
    if let Some(v) = rules.pair_tolerance {
        out = out.with_pair_tolerance(v);
    }
    if let Some(v) = rules.short_interval {
        out = out.with_short_interval(v);
    }
    if let Some(v) = rules.pause_ratio {
        out = out.with_pause_ratio(v);
    }
    out
}

/// Builds [`WaveRules`] from the TOML rules section.
pub fn build_wave_rules(rules: &RulesToml) -> WaveRules {
    let base = WaveRules::new();
    let mut out = base.with_p_duration(
        rules.min_p_duration.unwrap_or(base.min_p_duration()),
        rules.max_p_duration.unwrap_or(base.max_p_duration()),
    );
    if let Some(v) = rules.symmetry {
        out = out.with_symmetry(v);
    }
    if let Some(v) = rules.pt_separation {
        out = out.with_pt_separation(v);
    }
    if let Some(v) = rules.min_t_duration {
        out = out.with_min_t_duration(v);
    }
    if let Some(v) = rules.large_peak {
        out = out.with_large_peak(v);
    }
    if let Some(v) = rules.small_peak {
        out = out.with_small_peak(v);
    }
    if let Some(v) = rules.bpm_headroom {
        out = out.with_bpm_headroom(v);
    }
    out
}

/// Builds a validated [`DetectionConfig`] from the TOML detection and rules
/// sections. Unset fields keep the library defaults.
pub fn build_detection_config(d: &DetectionToml, rules: &RulesToml) -> Result<DetectionConfig> {
    let base = DetectionConfig::new();
    let mut cfg = base
        .clone()
        .with_bpm_range(
            d.min_bpm.unwrap_or(base.min_bpm()),
            d.max_bpm.unwrap_or(base.max_bpm()),
        )
        .with_qrs_duration(
            d.min_qrs.unwrap_or(base.min_qrs()),
            d.max_qrs.unwrap_or(base.max_qrs()),
        )
        .with_pq_range(
            d.min_pq.unwrap_or(base.min_pq()),
            d.max_pq.unwrap_or(base.max_pq()),
        )
        .with_qt_range(
            d.min_qt.unwrap_or(base.min_qt()),
            d.max_qt.unwrap_or(base.max_qt()),
        )
        .with_ectopic_rules(build_ectopic_rules(rules))
        .with_wave_rules(build_wave_rules(rules));
    if let Some(v) = d.qrs_frequency {
        cfg = cfg.with_qrs_frequency(v);
    }
    if let Some(ref name) = d.qrs_filter {
        cfg = cfg.with_qrs_filter(QrsFilter::from_name(name)?);
    }
    if let Some(v) = d.min_amplitude {
        cfg = cfg.with_min_amplitude(v);
    }
    if let Some(v) = d.p_frequency {
        cfg = cfg.with_p_frequency(v);
    }
    if let Some(v) = d.t_frequency {
        cfg = cfg.with_t_frequency(v);
    }
    if let Some(ref name) = d.t_wave {
        cfg = cfg.with_t_wave(TWaveShape::from_name(name)?);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`Denoiser`] from the TOML denoise section.
pub fn build_denoiser(dn: &DenoiseToml, sample_rate: f64, filters: FilterDir) -> Result<Denoiser> {
    Ok(Denoiser::new(sample_rate, filters)
        .with_mirror(dn.mirror)
        .with_threshold(ThresholdRule::from_name(&dn.threshold)?)
        .with_shrinkage(Shrinkage::from_name(&dn.shrinkage)?))
}
