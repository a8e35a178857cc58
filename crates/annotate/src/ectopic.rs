//! RR-interval rules that relabel beats as ectopic.

use crate::annotation::Annotation;
use crate::config::EctopicRules;
use crate::label::Label;

/// RR intervals (s) between consecutive beat starts of an alternating
/// onset/end list, with the last interval repeated for the final beat.
pub(crate) fn beat_intervals(qrs: &[Annotation], sample_rate: f64) -> Vec<f64> {
    let starts: Vec<usize> = qrs.iter().step_by(2).map(|a| a.offset).collect();
    let mut rrs: Vec<f64> = starts
        .windows(2)
        .map(|w| (w[1] as f64 - w[0] as f64) / sample_rate)
        .collect();
    if let Some(&last) = rrs.last() {
        rrs.push(last);
    }
    rrs
}

/// Interval triple centred on beat `beat`.
fn triple(rrs: &[f64], beat: usize) -> (f64, f64, f64) {
    match beat {
        0 => (rrs[1], rrs[0], rrs[0]),
        1 => (rrs[1], rrs[0], rrs[1]),
        b => (rrs[b - 2], rrs[b - 1], rrs[b]),
    }
}

fn is_ectopic(rules: &EctopicRules, (rr1, rr2, rr3): (f64, f64, f64)) -> bool {
    let short = rules.short_interval();
    let tol = rules.pair_tolerance();
    let premature = rules.short_ratio() * rr2 < rr1 && rules.short_ratio() * rr2 < rr3;
    let leading_pair = (rr1 - rr2).abs() < tol
        && rr1 < short
        && rr2 < short
        && rr3 > rules.pause_ratio() * (rr1 + rr2);
    let trailing_pair = (rr2 - rr3).abs() < tol
        && rr2 < short
        && rr3 < short
        && rr1 > rules.pause_ratio() * (rr2 + rr3);
    premature || leading_pair || trailing_pair
}

/// Relabels beat starts of `qrs` whose RR pattern matches a rule.
///
/// Returns the number of beats relabelled. Fewer than three beats leave the
/// list untouched.
pub(crate) fn label_ectopic(
    qrs: &mut [Annotation],
    sample_rate: f64,
    bpm: (f64, f64),
    rules: &EctopicRules,
) -> usize {
    let beats = qrs.len() / 2;
    if beats < 3 {
        return 0;
    }
    let rrs = beat_intervals(qrs, sample_rate);
    let in_range = |rr: f64| {
        let rate = 60.0 / rr;
        rate >= bpm.0 && rate <= bpm.1
    };

    let mut count = 0;
    for beat in 0..beats {
        let t = triple(&rrs, beat);
        if !(in_range(t.0) && in_range(t.1) && in_range(t.2)) {
            continue;
        }
        if is_ectopic(rules, t) {
            qrs[2 * beat].label = Label::Ectopic;
            count += 1;
        }
    }
    count
}
