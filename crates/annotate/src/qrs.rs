//! Gross QRS localization: band enhancement followed by run segmentation.

use ecgann_wavelet::{
    CwtConfig, FilterDir, Fwt, Shrinkage, ThresholdRule, Wavelet, cwt, high_frequency_levels,
    shrink_detail,
};
use tracing::{debug, trace};

use crate::config::{DetectionConfig, QrsFilter};
use crate::error::AnnotateError;

/// Magnitude at or below which a filtered sample counts as zero.
pub(crate) const ZERO_EPS: f64 = 1e-9;

fn is_zero(x: f64) -> bool {
    x.abs() <= ZERO_EPS
}

/// Enhances the QRS band and strips everything below roughly 30 Hz.
///
/// The result is zero wherever no steep deflection survives the hard
/// MINIMAX shrinkage, which is what the segmentation keys on.
pub(crate) fn prefilter(
    data: &[f64],
    sample_rate: f64,
    config: &DetectionConfig,
    filters: &FilterDir,
) -> Result<Vec<f64>, AnnotateError> {
    let bank = filters.load(config.qrs_filter().resource())?;
    let mut spectrum = cwt(
        data,
        config.qrs_frequency(),
        &CwtConfig::new(Wavelet::Gaussian1, sample_rate),
    );
    if config.qrs_filter() == QrsFilter::Ridge {
        for x in spectrum.iter_mut() {
            *x = *x * x.abs() / 2.0;
        }
    }

    let levels = high_frequency_levels(sample_rate);
    let mut fwt = Fwt::new(&spectrum, bank);
    fwt.transform(levels);
    shrink_detail(
        &mut fwt,
        sample_rate,
        2.0,
        ThresholdRule::Minimax,
        Shrinkage::Hard,
    );
    fwt.lo_band_mut().fill(0.0);
    fwt.synthesis(levels);
    let valid = fwt.lo_band_size();
    let mut out = fwt.into_spectrum();
    out[valid..].fill(0.0);
    debug!(levels, n = out.len(), "QRS band prefilter");
    Ok(out)
}

/// Look-ahead geometry derived from the rate and duration limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Cycle {
    /// Expected gap (s) between the end of one QRS and the next onset.
    pub gap: f64,
    /// Maximum rate after clamping.
    pub max_bpm: f64,
    /// Whether the configured maximum rate had to be lowered.
    pub clamped: bool,
}

impl Cycle {
    pub(crate) fn new(max_bpm: f64, max_qrs: f64, sample_rate: f64) -> Self {
        let gap = 60.0 / max_bpm - max_qrs;
        if (gap * sample_rate) as i64 <= 0 {
            Self {
                gap: 0.1,
                max_bpm: (60.0 / (max_qrs + 0.1)).floor(),
                clamped: true,
            }
        } else {
            Self {
                gap,
                max_bpm,
                clamped: false,
            }
        }
    }
}

/// Result of the run segmentation.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Segments {
    /// Accepted (onset, end) pairs in sample order.
    pub complexes: Vec<(usize, usize)>,
    /// Onsets of candidates discarded as noise.
    pub noise: Vec<usize>,
}

/// Splits the prefiltered signal into QRS candidates.
pub(crate) fn segment(
    filtered: &[f64],
    sample_rate: f64,
    cycle: Cycle,
    min_qrs: f64,
    max_qrs: f64,
) -> Segments {
    let size = filtered.len();
    let ec = ((cycle.gap * sample_rate) as usize).max(1);
    let mq = ((max_qrs * sample_rate) as usize).max(1);
    let half = (sample_rate / 2.0) as usize;
    let noisy = |from: usize| {
        filtered[from..(from + ec).min(size)]
            .iter()
            .any(|&x| !is_zero(x))
    };

    let step = ((0.1 * sample_rate) as usize).max(1);
    let mut m = 0;
    while m < size && !is_zero(filtered[m]) {
        m += step;
    }
    while m < size && is_zero(filtered[m]) {
        m += 1;
    }
    if m >= size {
        return Segments::default();
    }

    // Alternating onset/end positions; an odd length means an open candidate.
    let mut points = vec![m - 1];
    let mut noise = Vec::new();
    // Point count left after the last noise pop.
    let mut resumed_at = 0;
    while m < size {
        m = (m + mq).min(size - 1);
        if m + ec >= size {
            points.pop();
            break;
        }

        if noisy(m) {
            if let Some(onset) = points.pop() {
                if points.len() != resumed_at {
                    noise.push(onset);
                }
            }
            resumed_at = points.len();
            while m < size - ec && noisy(m) {
                m += ec;
            }
            if m >= size - ec {
                break;
            }
            while m < size && filtered[m] > ZERO_EPS {
                m += 1;
            }
            if m >= size {
                break;
            }
            trace!(onset = m - 1, "resuming after noise");
            points.push(m - 1);
            m += 1;
            continue;
        }

        let mut back = 0;
        while m > back && filtered[m - back] == 0.0 {
            back += 1;
        }
        if let Some(&onset) = points.last() {
            if (m - back + 1) as f64 - onset as f64 > min_qrs * sample_rate {
                points.push((m - back + 2).min(size - 1));
            } else {
                points.pop();
            }
        }

        m += ec;
        if m >= size || size - m < half {
            break;
        }
        while m < size && is_zero(filtered[m]) && size - m >= half {
            m += 1;
        }
        if m >= size || size - m < half {
            break;
        }
        points.push(m - 1);
        m += 1;
    }
    if points.len() % 2 == 1 {
        points.pop();
    }

    Segments {
        complexes: points.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
        noise,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse_train(size: usize, starts: &[usize], width: usize) -> Vec<f64> {
        let mut x = vec![0.0; size];
        for &s in starts {
            for (k, v) in x[s..s + width].iter_mut().enumerate() {
                *v = if k % 2 == 0 { 1.0 } else { -1.0 };
            }
        }
        x
    }

    #[test]
    fn cycle_is_clamped_when_non_positive() {
        let c = Cycle::new(200.0, 0.2, 360.0);
        assert!(!c.clamped);
        assert!((c.gap - 0.1).abs() < 1e-12);

        let c = Cycle::new(300.0, 0.2, 360.0);
        assert!(c.clamped);
        assert_eq!(c.gap, 0.1);
        assert_eq!(c.max_bpm, 199.0);
    }

    #[test]
    fn flat_input_has_no_candidates() {
        let seg = segment(&[0.0; 2000], 100.0, Cycle::new(200.0, 0.2, 100.0), 0.04, 0.2);
        assert!(seg.complexes.is_empty());
        assert!(seg.noise.is_empty());
    }

    #[test]
    fn separated_bursts_become_complexes() {
        let filtered = pulse_train(1000, &[100, 300, 500, 700], 8);
        let seg = segment(&filtered, 100.0, Cycle::new(200.0, 0.2, 100.0), 0.04, 0.2);
        assert_eq!(seg.complexes.len(), 4);
        for (&(on, end), start) in seg.complexes.iter().zip([100, 300, 500, 700]) {
            assert_eq!(on, start - 1);
            assert!(end > on && end <= start + 9, "({on}, {end})");
        }
        assert!(seg.noise.is_empty());
    }

    #[test]
    fn short_bursts_are_rejected() {
        let filtered = pulse_train(1000, &[100, 300, 500, 700], 2);
        let seg = segment(&filtered, 100.0, Cycle::new(200.0, 0.2, 100.0), 0.04, 0.2);
        assert!(seg.complexes.is_empty());
    }

    fn noise_burst(filtered: &mut [f64], range: std::ops::Range<usize>) {
        for (k, v) in filtered[range].iter_mut().enumerate() {
            *v = if k % 2 == 0 { 0.5 } else { -0.5 };
        }
    }

    #[test]
    fn short_resume_does_not_mark_the_next_candidate() {
        // The resume points at 700 and 1200 are both dropped as too short,
        // so the noisy candidate at 899 is not marked.
        let mut filtered = pulse_train(2000, &[100, 900, 1400], 8);
        noise_burst(&mut filtered, 300..700);
        noise_burst(&mut filtered, 915..1200);
        let seg = segment(&filtered, 100.0, Cycle::new(200.0, 0.2, 100.0), 0.04, 0.2);
        assert_eq!(seg.noise, vec![299]);
        assert_eq!(seg.complexes, vec![(99, 109), (1399, 1409)]);
    }

    #[test]
    fn noisy_first_candidate_is_unmarked() {
        let mut filtered = pulse_train(1000, &[700], 8);
        noise_burst(&mut filtered, 100..500);
        let seg = segment(&filtered, 100.0, Cycle::new(200.0, 0.2, 100.0), 0.04, 0.2);
        assert!(seg.noise.is_empty());
        assert_eq!(seg.complexes, vec![(699, 709)]);
    }

    #[test]
    fn sustained_activity_is_noise() {
        let mut filtered = pulse_train(1500, &[100, 900, 1100], 8);
        for (k, v) in filtered[300..700].iter_mut().enumerate() {
            *v = if k % 2 == 0 { 0.5 } else { -0.5 };
        }
        let seg = segment(&filtered, 100.0, Cycle::new(200.0, 0.2, 100.0), 0.04, 0.2);
        assert_eq!(seg.noise, vec![299]);
        assert!(seg.complexes.iter().all(|&(on, _)| !(300..700).contains(&on)));
        assert!(seg.complexes.iter().any(|&(on, _)| on == 99));
    }
}
