//! P and T wave localization inside one inter-beat gap.
//!
//! Both searches run a low-frequency CWT over a window of the raw signal.
//! The spectrum minimum and maximum bracket the wave, and the zero
//! crossing between them marks its peak. A candidate survives only if the
//! bracket changes sign, has a plausible duration and interval to the beat,
//! and is roughly symmetric around the crossing.

use ecgann_wavelet::{CwtConfig, Wavelet, cwt};
use tracing::trace;

use crate::config::DetectionConfig;

/// Tolerance used when matching samples against an extremum value.
pub(crate) const FLOAT_EQ: f64 = 1e-9;

/// Absolute sample positions of one accepted wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Wave {
    pub onset: usize,
    pub peak: usize,
    pub offset: usize,
}

/// Last indices of the spectrum minimum and maximum, in increasing order.
fn bracket(spectrum: &[f64]) -> Option<(usize, usize)> {
    let (min, max) = ecgann_stats::min_max(spectrum)?;
    let mut lo = 0;
    let mut hi = 0;
    for (i, &x) in spectrum.iter().enumerate() {
        if (x - min).abs() < FLOAT_EQ {
            lo = i;
        }
        if (x - max).abs() < FLOAT_EQ {
            hi = i;
        }
    }
    Some((lo.min(hi), lo.max(hi)))
}

fn opposite_signs(a: f64, b: f64) -> bool {
    (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0)
}

/// First index in `[from, to)` where the spectrum leaves the sign it has
/// at `from`.
fn zero_crossing(spectrum: &[f64], from: usize, to: usize) -> Option<usize> {
    let positive = spectrum[from] > 0.0;
    (from..to).find(|&i| {
        if positive {
            spectrum[i] <= 0.0
        } else {
            spectrum[i] >= 0.0
        }
    })
}

fn symmetric(onset: usize, peak: usize, offset: usize, ratio: f64) -> bool {
    let left = (peak - onset) as f64;
    let right = (offset - peak) as f64;
    let longer = left.max(right);
    longer > 0.0 && left.min(right) / longer >= ratio
}

/// Raw-signal extremum nearest the window centre, relative to the window.
fn central_extremum(window: &[f64]) -> Option<usize> {
    let (min, max) = ecgann_stats::min_max(window)?;
    let top = window.iter().position(|&x| (x - max).abs() < FLOAT_EQ)?;
    let bottom = window.iter().position(|&x| (x - min).abs() < FLOAT_EQ)?;
    let half = (window.len() / 2) as i64;
    if (top as i64 - half).abs() < (bottom as i64 - half).abs() {
        Some(top)
    } else {
        Some(bottom)
    }
}

/// Bracket, sign and zero crossing of a wave spectrum, relative to it.
struct Candidate {
    onset: usize,
    peak: usize,
    offset: usize,
}

fn candidate(
    spectrum: &[f64],
    accept: impl FnOnce(usize, usize) -> bool,
    symmetry: f64,
) -> Option<Candidate> {
    let (onset, offset) = bracket(spectrum)?;
    if !opposite_signs(spectrum[onset], spectrum[offset]) || !accept(onset, offset) {
        return None;
    }
    let peak = zero_crossing(spectrum, onset, offset)?;
    if !symmetric(onset, peak, offset, symmetry) {
        return None;
    }
    Some(Candidate {
        onset,
        peak,
        offset,
    })
}

/// P/T search over one recording.
pub(crate) struct WaveFinder<'a> {
    data: &'a [f64],
    sample_rate: f64,
    config: &'a DetectionConfig,
}

impl<'a> WaveFinder<'a> {
    pub(crate) fn new(data: &'a [f64], sample_rate: f64, config: &'a DetectionConfig) -> Self {
        Self {
            data,
            sample_rate,
            config,
        }
    }

    /// T wave following the beat that spans `beat_start..=qrs_end`.
    pub(crate) fn t_wave(&self, beat_start: usize, qrs_end: usize, next_start: usize) -> Option<Wave> {
        let sr = self.sample_rate;
        let gap = next_start.checked_sub(qrs_end)?;
        let reach = sr * self.config.max_qt() - (qrs_end - beat_start) as f64;
        let len = if reach > gap as f64 {
            gap
        } else {
            reach.floor().max(0.0) as usize
        };
        if len < 2 {
            return None;
        }
        let window = &self.data[qrs_end..qrs_end + len];
        let spectrum = cwt(
            window,
            self.config.t_frequency(),
            &CwtConfig::new(self.config.t_wave().wavelet(), sr),
        );

        let rules = self.config.wave_rules();
        let (min_qt, max_qt) = (self.config.min_qt() * sr, self.config.max_qt() * sr);
        let found = candidate(
            &spectrum,
            |onset, offset| {
                let qt = (qrs_end + offset - beat_start) as f64;
                (offset - onset) as f64 >= rules.min_t_duration() * sr
                    && qt >= min_qt
                    && qt <= max_qt
            },
            rules.symmetry(),
        )?;

        let mut peak = found.peak;
        let span = &window[found.onset..found.offset];
        if let Some(c) = central_extremum(span) {
            let half = (span.len() / 2) as i64;
            let zero = (found.peak - found.onset) as i64;
            if (c as i64 - half).abs() < (zero - half).abs() {
                peak = found.onset + c;
            }
        }
        trace!(onset = qrs_end + found.onset, peak = qrs_end + peak, "T wave");
        Some(Wave {
            onset: qrs_end + found.onset,
            peak: qrs_end + peak,
            offset: qrs_end + found.offset,
        })
    }

    /// P wave preceding the beat that starts at `next_start`, kept clear of
    /// an accepted T wave ending at `t_offset`.
    pub(crate) fn p_wave(
        &self,
        qrs_end: usize,
        next_start: usize,
        t_offset: Option<usize>,
    ) -> Option<Wave> {
        let sr = self.sample_rate;
        let rules = self.config.wave_rules();
        let gap = next_start.checked_sub(qrs_end)? as i64;
        let mut size = gap;
        if sr * self.config.max_pq() < size as f64 {
            size = (sr * self.config.max_pq()) as i64;
        }
        if let Some(t_end) = t_offset {
            let limit = next_start as i64 - size - (rules.pt_separation() * sr) as i64;
            if t_end as i64 > limit {
                size -= t_end as i64 - limit;
            }
        }
        if size as f64 <= rules.min_p_duration() * sr {
            return None;
        }
        let start = next_start - size as usize;
        let spectrum = cwt(
            &self.data[start..next_start],
            self.config.p_frequency(),
            &CwtConfig::new(Wavelet::Gaussian1, sr),
        );

        let (min_pq, max_pq) = (self.config.min_pq() * sr, self.config.max_pq() * sr);
        let (min_dur, max_dur) = (rules.min_p_duration() * sr, rules.max_p_duration() * sr);
        let found = candidate(
            &spectrum,
            |onset, offset| {
                let duration = (offset - onset) as f64;
                let pq = (next_start - start - onset) as f64;
                duration >= min_dur && duration <= max_dur && pq >= min_pq && pq <= max_pq
            },
            rules.symmetry(),
        )?;
        trace!(onset = start + found.onset, peak = start + found.peak, "P wave");
        Some(Wave {
            onset: start + found.onset,
            peak: start + found.peak,
            offset: start + found.offset,
        })
    }
}
