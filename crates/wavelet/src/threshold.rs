//! Windowed threshold shrinkage of wavelet detail bands.

use ecgann_stats::sd;

use crate::error::WaveletError;

/// Windows shorter than this are left untouched.
const MIN_TAIL: usize = 5;

/// Statistic that turns a window's spread into a threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThresholdRule {
    /// `σ·(0.3936 + 0.1829·ln n)`.
    #[default]
    Minimax,
    /// Universal threshold, `σ·√(2 ln n)`.
    Fixed,
    /// `σ·√(2 ln(n ln n))`.
    Sure,
}

impl ThresholdRule {
    /// Parses `minimax`, `fixed` or `sure`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::UnsupportedThreshold`] for any other name.
    pub fn from_name(name: &str) -> Result<Self, WaveletError> {
        match name.to_lowercase().as_str() {
            "minimax" => Ok(Self::Minimax),
            "fixed" => Ok(Self::Fixed),
            "sure" => Ok(Self::Sure),
            _ => Err(WaveletError::UnsupportedThreshold(name.to_string())),
        }
    }

    /// Threshold for `window` using the sample standard deviation.
    pub fn threshold(&self, window: &[f64]) -> f64 {
        let n = window.len() as f64;
        let sigma = sd(window);
        match self {
            Self::Minimax => sigma * (0.3936 + 0.1829 * n.ln()),
            Self::Fixed => sigma * (2.0 * n.ln()).sqrt(),
            Self::Sure => sigma * (2.0 * (n * n.ln()).ln()).sqrt(),
        }
    }
}

/// How coefficients at or below the threshold are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Shrinkage {
    /// Zero small coefficients, keep the rest.
    Hard,
    /// Zero small coefficients, pull the rest towards zero by the threshold.
    #[default]
    Soft,
}

impl Shrinkage {
    /// Parses `hard` or `soft`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::UnsupportedThreshold`] for any other name.
    pub fn from_name(name: &str) -> Result<Self, WaveletError> {
        match name.to_lowercase().as_str() {
            "hard" => Ok(Self::Hard),
            "soft" => Ok(Self::Soft),
            _ => Err(WaveletError::UnsupportedThreshold(name.to_string())),
        }
    }

    fn apply(&self, values: &mut [f64], th: f64) {
        for x in values.iter_mut() {
            if x.abs() <= th {
                *x = 0.0;
            } else if *self == Self::Soft {
                *x -= th.copysign(*x);
            }
        }
    }
}

/// Thresholds `band` in consecutive windows of `window` samples.
///
/// Every complete window gets its own threshold. A trailing partial window
/// is processed only when it holds more than five samples. A zero window
/// leaves the band untouched.
pub fn shrink_windows(band: &mut [f64], window: usize, rule: ThresholdRule, shrinkage: Shrinkage) {
    if window == 0 {
        return;
    }
    for chunk in band.chunks_mut(window) {
        if chunk.len() < window && chunk.len() <= MIN_TAIL {
            continue;
        }
        let th = rule.threshold(chunk);
        shrinkage.apply(chunk, th);
    }
}
