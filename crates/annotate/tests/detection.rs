//! QRS detection and ectopic labelling on synthetic pulse trains.

use ecgann_annotate::{Annotator, DetectionConfig, Label};
use ecgann_wavelet::FilterDir;

fn filters() -> FilterDir {
    FilterDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../filters"))
}

/// `len` samples holding Gaussian pulses of width `width` seconds centred
/// at `times`.
fn pulses_at(sample_rate: f64, times: &[f64], width: f64, len: usize) -> Vec<f64> {
    let sigma = width * sample_rate;
    let mut data = vec![0.0; len];
    for &t in times {
        let centre = t * sample_rate;
        for (i, x) in data.iter_mut().enumerate() {
            let d = (i as f64 - centre) / sigma;
            *x += (-d * d / 2.0).exp();
        }
    }
    data
}

fn periodic(sample_rate: f64, period: f64, beats: usize, width: f64) -> Vec<f64> {
    let times: Vec<f64> = (0..beats).map(|k| 0.5 + k as f64 * period).collect();
    let len = ((beats as f64 * period + 1.0) * sample_rate) as usize;
    pulses_at(sample_rate, &times, width, len)
}

#[test]
fn rate_recovery() {
    let cases = [
        (250.0, 0.8, 10, 0.012),
        (360.0, 0.8, 10, 0.012),
        (360.0, 1.0, 8, 0.01),
        (500.0, 0.6, 12, 0.012),
        (250.0, 1.2, 6, 0.015),
        (360.0, 0.5, 14, 0.012),
    ];
    for (sr, period, beats, width) in cases {
        let data = periodic(sr, period, beats, width);
        let mut annotator = Annotator::new(DetectionConfig::new(), filters()).unwrap();
        annotator.detect_qrs(&data, sr).unwrap();
        let found = annotator.qrs_count() as i64;
        assert!(
            (found - beats as i64).abs() <= 1,
            "sr {sr}, period {period}: {found} beats, expected {beats}"
        );
    }
}

#[test]
fn detected_onsets_precede_their_pulses() {
    let sr = 360.0;
    let data = periodic(sr, 0.8, 10, 0.012);
    let mut annotator = Annotator::new(DetectionConfig::new(), filters()).unwrap();
    let qrs = annotator.detect_qrs(&data, sr).unwrap().to_vec();
    for pair in qrs.chunks_exact(2) {
        assert_eq!(pair[0].label, Label::NORMAL);
        assert_eq!(pair[1].label, Label::QrsEnd);
        assert!(pair[0].offset < pair[1].offset);
        let width = (pair[1].offset - pair[0].offset) as f64 / sr;
        assert!(width >= 0.04 && width <= 0.3, "width {width}");
    }
    for w in qrs.windows(2) {
        assert!(w[0].offset <= w[1].offset);
    }
}

#[test]
fn flat_line_has_no_beats() {
    for (sr, len) in [(250.0, 10), (250.0, 5000), (360.0, 3600), (1000.0, 20_000)] {
        let mut annotator = Annotator::new(DetectionConfig::new(), filters()).unwrap();
        let qrs = annotator.detect_qrs(&vec![0.7; len], sr).unwrap();
        assert!(qrs.is_empty(), "sr {sr}, len {len}");
        assert_eq!(annotator.qrs_count(), 0);
    }
}

#[test]
fn short_signal_has_no_beats() {
    let data = pulses_at(360.0, &[0.15], 0.012, 100);
    let mut annotator = Annotator::new(DetectionConfig::new(), filters()).unwrap();
    assert_eq!(annotator.detect_qrs(&data, 360.0).unwrap().len(), 0);
}

#[test]
fn detection_is_deterministic() {
    let data = periodic(250.0, 0.8, 10, 0.012);
    let mut a = Annotator::new(DetectionConfig::new(), filters()).unwrap();
    let mut b = Annotator::new(DetectionConfig::new(), filters()).unwrap();
    let first = a.detect_qrs(&data, 250.0).unwrap().to_vec();
    let second = b.detect_qrs(&data, 250.0).unwrap().to_vec();
    assert_eq!(first, second);
    let again = a.detect_qrs(&data, 250.0).unwrap().to_vec();
    assert_eq!(first, again);
}

#[test]
fn pause_after_short_pair_is_ectopic() {
    let rrs = [1.0, 1.0, 1.0, 0.4, 0.4, 2.0, 1.0, 1.0];
    let mut times = vec![0.5];
    for rr in rrs {
        times.push(times[times.len() - 1] + rr);
    }
    for sr in [250.0, 360.0] {
        let len = ((times[times.len() - 1] + 1.0) * sr) as usize;
        let data = pulses_at(sr, &times, 0.012, len);
        let config = DetectionConfig::new().with_bpm_range(25.0, 200.0);
        let mut annotator = Annotator::new(config, filters()).unwrap();
        annotator.detect_qrs(&data, sr).unwrap();
        assert_eq!(annotator.qrs_count(), 9);
        assert_eq!(annotator.label_ectopic(sr), 1);
        let qrs = annotator.qrs_annotations();
        assert_eq!(qrs[10].label, Label::Ectopic);
        let ectopic = qrs.iter().filter(|a| a.label == Label::Ectopic).count();
        assert_eq!(ectopic, 1);
    }
}

#[test]
fn regular_rhythm_has_no_ectopy() {
    let data = periodic(360.0, 0.8, 10, 0.012);
    let mut annotator = Annotator::new(DetectionConfig::new(), filters()).unwrap();
    annotator.detect_qrs(&data, 360.0).unwrap();
    assert_eq!(annotator.label_ectopic(360.0), 0);
}
