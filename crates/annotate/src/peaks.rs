//! q/r/s sub-peaks inside a QRS window of the baseline-corrected signal.

use ecgann_stats::min_max;

use crate::config::WaveRules;
use crate::label::{Label, SubPeakKind};
use crate::waves::FLOAT_EQ;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Extremum {
    Max,
    Min,
}

/// Window extremum that is not attained at either endpoint and has the
/// expected sign.
fn inner_extremum(window: &[f64], kind: Extremum) -> Option<f64> {
    if window.len() < 3 {
        return None;
    }
    let (min, max) = min_max(window)?;
    let (value, wrong_sign) = match kind {
        Extremum::Max => (max, max < 0.0),
        Extremum::Min => (min, min > 0.0),
    };
    let first = window[0];
    let last = window[window.len() - 1];
    if wrong_sign || (value - first).abs() < FLOAT_EQ || (value - last).abs() < FLOAT_EQ {
        return None;
    }
    Some(value)
}

fn position(window: &[f64], value: f64) -> Option<usize> {
    (1..window.len() - 1).find(|&i| (window[i] - value).abs() < FLOAT_EQ)
}

/// Dominant R (maximum) and S (minimum) of a QRS window, relative to it.
fn find_rs(window: &[f64], min_amplitude: f64) -> (Option<usize>, Option<usize>) {
    let r = inner_extremum(window, Extremum::Max)
        .filter(|&max| max >= min_amplitude)
        .and_then(|max| position(window, max));
    let s = inner_extremum(window, Extremum::Min)
        .filter(|&min| -min >= min_amplitude)
        .and_then(|min| position(window, min));
    (r, s)
}

/// Small extremum standing at least `prominence` off `reference`.
fn find_small(window: &[f64], kind: Extremum, reference: f64, prominence: f64) -> Option<usize> {
    let value = inner_extremum(window, kind)?;
    if (value - reference).abs() < prominence {
        return None;
    }
    position(window, value)
}

/// Absolute positions of the sub-peaks found in one QRS window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SubPeaks {
    pub q: Option<usize>,
    pub r: Option<usize>,
    pub s: Option<usize>,
}

impl SubPeaks {
    /// Labelled sub-peaks in sample order.
    pub(crate) fn labelled(&self, buf: &[f64], large_peak: f64) -> Vec<(usize, Label)> {
        let mut out: Vec<(usize, Label)> = [
            (self.q, SubPeakKind::Q),
            (self.r, SubPeakKind::R),
            (self.s, SubPeakKind::S),
        ]
        .into_iter()
        .filter_map(|(pos, peak)| {
            pos.map(|p| {
                let large = buf[p].abs() > large_peak;
                (p, Label::SubPeak { peak, large })
            })
        })
        .collect();
        out.sort_by_key(|&(p, _)| p);
        out
    }
}

/// Searches `buf[start..=end]` for R and S, then for the complementary
/// small q, r or s.
///
/// Returns `None` when the window holds neither an R nor an S peak.
pub(crate) fn locate_sub_peaks(
    buf: &[f64],
    start: usize,
    end: usize,
    min_amplitude: f64,
    rules: &WaveRules,
) -> Option<SubPeaks> {
    let end = end.min(buf.len().checked_sub(1)?);
    if end < start {
        return None;
    }
    let window = &buf[start..=end];
    let small = rules.small_peak();
    let (r, s) = find_rs(window, min_amplitude);
    let at = |offset: usize| move |i: usize| i + offset;

    let mut peaks = SubPeaks {
        q: None,
        r: r.map(at(start)),
        s: s.map(at(start)),
    };
    match (peaks.r, peaks.s) {
        (Some(r), Some(s)) if s < r => {
            if buf[r] > -buf[s] {
                peaks.q = Some(s);
                let tail = &buf[r..=end];
                peaks.s = find_small(tail, Extremum::Min, tail[tail.len() - 1], small).map(at(r));
            }
        }
        (Some(r), Some(_)) => {
            let head = &buf[start..=r];
            peaks.q = find_small(head, Extremum::Min, head[0], small).map(at(start));
        }
        (None, Some(s)) => {
            let head = &buf[start..=s];
            peaks.r = find_small(head, Extremum::Max, head[0], small).map(at(start));
        }
        (Some(r), None) => {
            let head = &buf[start..=r];
            peaks.q = find_small(head, Extremum::Min, head[0], small).map(at(start));
            let tail = &buf[r..=end];
            peaks.s = find_small(tail, Extremum::Min, tail[tail.len() - 1], small).map(at(r));
        }
        (None, None) => return None,
    }
    Some(peaks)
}
