//! Beat-to-beat heart rate from a merged annotation list.

use crate::annotation::Annotation;
use crate::label::{Label, RrRole, SubPeakKind};

/// Instantaneous heart rates and the fiducial sample each one starts at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RrSeries {
    /// Heart rate in bpm for each accepted interval.
    pub values: Vec<f64>,
    /// Sample position of the earlier fiducial of each interval.
    pub positions: Vec<usize>,
}

impl RrSeries {
    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no interval was accepted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean heart rate in bpm, 0.0 when empty.
    pub fn mean_bpm(&self) -> f64 {
        ecgann_stats::mean(&self.values)
    }
}

/// Fiducial resolution around a beat annotation.
struct Fiducials<'a> {
    list: &'a [Annotation],
    on_s: bool,
}

impl Fiducials<'_> {
    fn is(&self, i: usize, kind: SubPeakKind) -> bool {
        self.list.get(i).is_some_and(|a| a.label.is_sub_peak(kind))
    }

    /// Sample of the fiducial belonging to the beat at `i`, or `previous`
    /// when S mode finds nothing.
    fn resolve(&self, i: usize, previous: usize) -> usize {
        let at = |k: usize| self.list[k].offset;
        if !self.on_s {
            return if self.is(i + 1, SubPeakKind::R) {
                at(i + 1)
            } else if self.is(i + 2, SubPeakKind::R) {
                at(i + 2)
            } else {
                at(i)
            };
        }
        if self.list.get(i + 1).is_some_and(|a| a.label == Label::QrsEnd) {
            return at(i);
        }
        if let Some(k) = (i + 1..=i + 3).find(|&k| self.is(k, SubPeakKind::S)) {
            return at(k);
        }
        if let Some(k) = (i + 1..=i + 2).find(|&k| self.is(k, SubPeakKind::R)) {
            return at(k);
        }
        previous
    }
}

/// Extracts heart rates between consecutive beats.
///
/// The fiducial is the R peak unless S peaks outnumber R peaks by more
/// than 20 %. Noise, artifact and ectopic annotations break the chain, and
/// rates outside `bpm` are dropped.
pub(crate) fn rr_sequence(list: &[Annotation], sample_rate: f64, bpm: (f64, f64)) -> RrSeries {
    let count = |kind| list.iter().filter(|a| a.label.is_sub_peak(kind)).count();
    let (r_count, s_count) = (count(SubPeakKind::R), count(SubPeakKind::S));
    let fiducials = Fiducials {
        list,
        on_s: ((1.2 * r_count as f64) as usize) < s_count,
    };

    let mut series = RrSeries::default();
    let mut previous: Option<usize> = None;
    let (mut r1, mut r2) = (0usize, 0usize);
    for (i, a) in list.iter().enumerate() {
        match a.label.rr_role() {
            RrRole::Skip => continue,
            RrRole::Reset => {
                previous = None;
                continue;
            }
            RrRole::Beat => {}
        }
        if let Some(prev) = previous {
            r2 = fiducials.resolve(i, r2);
            r1 = fiducials.resolve(prev, r1);
            let rate = 60.0 / ((r2 as f64 - r1 as f64) / sample_rate);
            if rate >= bpm.0 && rate <= bpm.1 {
                series.values.push(rate);
                series.positions.push(r1);
            }
        }
        previous = Some(i);
    }
    series
}
