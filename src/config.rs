use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Top-level ecgann configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EcgannConfig {
    /// Detection parameters; unset fields keep the library defaults.
    #[serde(default)]
    pub detection: DetectionToml,

    /// Empirical ectopic and wave constants.
    #[serde(default)]
    pub rules: RulesToml,

    /// Filter resource location.
    #[serde(default)]
    pub filters: FiltersToml,

    /// Input signal settings.
    #[serde(default)]
    pub signal: SignalToml,

    /// Denoise settings.
    #[serde(default)]
    pub denoise: DenoiseToml,
}

impl EcgannConfig {
    /// Reads `path`, or returns all defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectionToml {
    pub min_bpm: Option<f64>,
    pub max_bpm: Option<f64>,
    pub min_qrs: Option<f64>,
    pub max_qrs: Option<f64>,
    pub qrs_frequency: Option<f64>,
    pub qrs_filter: Option<String>,
    pub min_amplitude: Option<f64>,
    pub min_pq: Option<f64>,
    pub max_pq: Option<f64>,
    pub min_qt: Option<f64>,
    pub max_qt: Option<f64>,
    pub p_frequency: Option<f64>,
    pub t_frequency: Option<f64>,
    pub t_wave: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesToml {
    pub short_ratio: Option<f64>,
    pub pair_tolerance: Option<f64>,
    pub short_interval: Option<f64>,
    pub pause_ratio: Option<f64>,
    pub symmetry: Option<f64>,
    pub pt_separation: Option<f64>,
    pub min_t_duration: Option<f64>,
    pub min_p_duration: Option<f64>,
    pub max_p_duration: Option<f64>,
    pub large_peak: Option<f64>,
    pub small_peak: Option<f64>,
    pub bpm_headroom: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersToml {
    #[serde(default = "default_filter_dir")]
    pub dir: PathBuf,
}

impl Default for FiltersToml {
    fn default() -> Self {
        Self {
            dir: default_filter_dir(),
        }
    }
}

fn default_filter_dir() -> PathBuf {
    PathBuf::from("filters")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalToml {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default = "default_lead")]
    pub lead: usize,
}

impl Default for SignalToml {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            lead: default_lead(),
        }
    }
}

fn default_sample_rate() -> f64 {
    360.0
}
fn default_lead() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DenoiseToml {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_threshold")]
    pub threshold: String,
    #[serde(default = "default_shrinkage")]
    pub shrinkage: String,
    #[serde(default = "default_true")]
    pub mirror: bool,
}

impl Default for DenoiseToml {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            threshold: default_threshold(),
            shrinkage: default_shrinkage(),
            mirror: true,
        }
    }
}

fn default_mode() -> String {
    "lfhf".to_string()
}
fn default_threshold() -> String {
    "minimax".to_string()
}
fn default_shrinkage() -> String {
    "soft".to_string()
}
fn default_true() -> bool {
    true
}
