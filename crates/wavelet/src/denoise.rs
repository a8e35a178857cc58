//! Baseline-wander and high-frequency removal built on the FWT.

use ecgann_stats::{min_max, normalize_by_min_max};
use tracing::debug;

use crate::error::WaveletError;
use crate::filter::{FilterDir, FilterResource};
use crate::fwt::Fwt;
use crate::threshold::{Shrinkage, ThresholdRule, shrink_windows};

/// Depth of the baseline-wander decomposition, `⌈log2(sr/0.8)⌉ − 1`.
pub fn baseline_levels(sample_rate: f64) -> usize {
    depth(sample_rate / 0.8, 1)
}

/// Depth of the high-frequency decomposition, `⌈log2(sr/23)⌉ − 2`.
pub fn high_frequency_levels(sample_rate: f64) -> usize {
    depth(sample_rate / 23.0, 2)
}

fn depth(ratio: f64, minus: i64) -> usize {
    let j = ratio.log2().ceil() as i64 - minus;
    j.max(0) as usize
}

/// Thresholds every applied detail band of `fwt`.
///
/// Level `j` is processed in windows of `⌊span·sr / 2^j⌋` samples.
pub fn shrink_detail(
    fwt: &mut Fwt,
    sample_rate: f64,
    span: f64,
    rule: ThresholdRule,
    shrinkage: Shrinkage,
) {
    for level in (1..=fwt.levels()).rev() {
        let window = (span * sample_rate / 2f64.powi(level as i32)).floor() as usize;
        if let Some(band) = fwt.high_band_mut(level) {
            shrink_windows(band, window, rule, shrinkage);
        }
    }
}

/// Signal cleaner operating on a padded copy of the input.
///
/// The input is extended by `⌊sr⌋` samples on each side (mirrored, or held
/// at the edge value) before decomposition, and only the centre is copied
/// back.
///
/// # Example
///
/// ```ignore
/// use ecgann_wavelet::{Denoiser, FilterDir};
///
/// let denoiser = Denoiser::new(360.0, FilterDir::new("filters"));
/// denoiser.lf_denoise(&mut signal)?;
/// ```
#[derive(Clone, Debug)]
pub struct Denoiser {
    sample_rate: f64,
    filters: FilterDir,
    mirror: bool,
    rule: ThresholdRule,
    shrinkage: Shrinkage,
}

impl Denoiser {
    /// Creates a denoiser with mirrored padding and soft MINIMAX shrinkage.
    pub fn new(sample_rate: f64, filters: FilterDir) -> Self {
        Self {
            sample_rate,
            filters,
            mirror: true,
            rule: ThresholdRule::Minimax,
            shrinkage: Shrinkage::Soft,
        }
    }

    /// Chooses mirrored (`true`) or constant (`false`) padding.
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Sets the statistic used by the high-frequency pass.
    pub fn with_threshold(mut self, rule: ThresholdRule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the shrinkage used by the high-frequency pass.
    pub fn with_shrinkage(mut self, shrinkage: Shrinkage) -> Self {
        self.shrinkage = shrinkage;
        self
    }

    /// Returns the sampling rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Returns the filter directory.
    pub fn filters(&self) -> &FilterDir {
        &self.filters
    }

    /// Removes baseline wander: the lowest band of a deep Daubechies
    /// decomposition is zeroed.
    ///
    /// # Errors
    ///
    /// Fails on a non-positive sample rate or an unreadable filter resource;
    /// `data` is unchanged in that case.
    pub fn lf_denoise(&self, data: &mut [f64]) -> Result<(), WaveletError> {
        self.check()?;
        if data.is_empty() {
            return Ok(());
        }
        let (buf, pad) = self.padded(data);
        let buf = self.baseline_pass(buf)?;
        data.copy_from_slice(&buf[pad..pad + data.len()]);
        Ok(())
    }

    /// Suppresses content above roughly 30 Hz by shrinking CDF 9/7 detail
    /// bands.
    ///
    /// # Errors
    ///
    /// As [`Denoiser::lf_denoise`].
    pub fn hf_denoise(&self, data: &mut [f64]) -> Result<(), WaveletError> {
        self.check()?;
        if data.is_empty() {
            return Ok(());
        }
        let (buf, pad) = self.padded(data);
        let buf = self.high_frequency_pass(buf)?;
        data.copy_from_slice(&buf[pad..pad + data.len()]);
        Ok(())
    }

    /// Runs both passes and maps the result back onto the value range seen
    /// after baseline removal.
    ///
    /// # Errors
    ///
    /// As [`Denoiser::lf_denoise`].
    pub fn lfhf_denoise(&self, data: &mut [f64]) -> Result<(), WaveletError> {
        self.check()?;
        if data.is_empty() {
            return Ok(());
        }
        let n = data.len();
        let (buf, pad) = self.padded(data);
        let buf = self.baseline_pass(buf)?;
        let range = min_max(&buf[pad..pad + n]);
        let buf = self.high_frequency_pass(buf)?;
        data.copy_from_slice(&buf[pad..pad + n]);
        if let Some((lo, hi)) = range {
            normalize_by_min_max(data, lo, hi);
        }
        Ok(())
    }

    fn check(&self) -> Result<(), WaveletError> {
        if self.sample_rate.is_finite() && self.sample_rate >= 1.0 {
            Ok(())
        } else {
            Err(WaveletError::InvalidSampleRate(self.sample_rate))
        }
    }

    fn padded(&self, data: &[f64]) -> (Vec<f64>, usize) {
        let n = data.len();
        let pad = self.sample_rate.floor() as usize;
        let mirror = self.mirror && n > pad;
        let mut buf = Vec::with_capacity(n + 2 * pad);
        if mirror {
            buf.extend((0..pad).map(|i| data[pad - i]));
            buf.extend_from_slice(data);
            buf.extend((0..pad).map(|i| data[n - 2 - i]));
        } else {
            buf.extend(std::iter::repeat_n(data[0], pad));
            buf.extend_from_slice(data);
            buf.extend(std::iter::repeat_n(data[n - 1], pad));
        }
        (buf, pad)
    }

    fn baseline_pass(&self, buf: Vec<f64>) -> Result<Vec<f64>, WaveletError> {
        let bank = self.filters.load(FilterResource::BaselineWander)?;
        let levels = baseline_levels(self.sample_rate);
        debug!(levels, n = buf.len(), "baseline wander removal");
        let mut fwt = Fwt::new(&buf, bank);
        fwt.transform(levels);
        fwt.lo_band_mut().fill(0.0);
        fwt.synthesis(levels);
        Ok(fwt.into_spectrum())
    }

    fn high_frequency_pass(&self, buf: Vec<f64>) -> Result<Vec<f64>, WaveletError> {
        let bank = self.filters.load(FilterResource::HighFrequency)?;
        let levels = high_frequency_levels(self.sample_rate);
        debug!(
            levels,
            n = buf.len(),
            rule = ?self.rule,
            shrinkage = ?self.shrinkage,
            "high-frequency denoise"
        );
        let mut fwt = Fwt::new(&buf, bank);
        fwt.transform(levels);
        shrink_detail(&mut fwt, self.sample_rate, 3.0, self.rule, self.shrinkage);
        fwt.synthesis(levels);
        Ok(fwt.into_spectrum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_formulas() {
        assert_eq!(baseline_levels(360.0), 8);
        assert_eq!(baseline_levels(250.0), 8);
        assert_eq!(baseline_levels(100.0), 6);
        assert_eq!(high_frequency_levels(360.0), 2);
        assert_eq!(high_frequency_levels(500.0), 3);
        assert_eq!(high_frequency_levels(50.0), 0);
    }

    #[test]
    fn mirrored_padding_layout() {
        let d = Denoiser::new(3.0, FilterDir::default());
        let data = [10.0, 11.0, 12.0, 13.0, 14.0];
        let (buf, pad) = d.padded(&data);
        assert_eq!(pad, 3);
        assert_eq!(
            buf,
            vec![13.0, 12.0, 11.0, 10.0, 11.0, 12.0, 13.0, 14.0, 13.0, 12.0, 11.0]
        );
    }

    #[test]
    fn short_signal_falls_back_to_constant_padding() {
        let d = Denoiser::new(4.0, FilterDir::default());
        let (buf, _) = d.padded(&[1.0, 2.0, 3.0]);
        assert_eq!(buf, vec![1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn constant_padding_when_requested() {
        let d = Denoiser::new(2.0, FilterDir::default()).with_mirror(false);
        let (buf, _) = d.padded(&[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(buf, vec![5.0, 5.0, 5.0, 6.0, 7.0, 8.0, 8.0, 8.0]);
    }

    #[test]
    fn invalid_sample_rate_is_rejected() {
        let d = Denoiser::new(0.0, FilterDir::default());
        let mut data = vec![1.0; 10];
        let err = d.lf_denoise(&mut data).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidSampleRate(_)));
        assert_eq!(data, vec![1.0; 10]);
    }

    #[test]
    fn missing_resource_leaves_data_untouched() {
        let d = Denoiser::new(100.0, FilterDir::new("/nonexistent"));
        let mut data: Vec<f64> = (0..300).map(|i| i as f64).collect();
        let before = data.clone();
        assert!(matches!(
            d.hf_denoise(&mut data),
            Err(WaveletError::FilterNotFound { .. })
        ));
        assert_eq!(data, before);
    }
}
