//! End-to-end annotation of a synthetic ECG: waves, RR series and the
//! annotation file.

use ecgann_annotate::{
    Annotation, Annotator, DetectionConfig, Label, SubPeakKind, WaveKind, WavePoint,
    load_annotations,
};
use ecgann_wavelet::FilterDir;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

fn filters() -> FilterDir {
    FilterDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../filters"))
}

/// P, q, R, s and T Gaussians (offset s, width s, amplitude mV) per beat.
const BEAT: [(f64, f64, f64); 5] = [
    (-0.16, 0.02, 0.15),
    (-0.025, 0.008, -0.15),
    (0.0, 0.01, 1.2),
    (0.025, 0.008, -0.3),
    (0.3, 0.04, 0.3),
];

fn ecg(sample_rate: f64, period: f64, beats: usize) -> Vec<f64> {
    let len = ((beats as f64 * period + 1.0) * sample_rate) as usize;
    let mut data = vec![0.0; len];
    for k in 0..beats {
        let centre = 0.5 + k as f64 * period;
        for (offset, width, amplitude) in BEAT {
            let c = (centre + offset) * sample_rate;
            let s = width * sample_rate;
            let lo = (c - 6.0 * s).max(0.0) as usize;
            let hi = ((c + 6.0 * s) as usize + 1).min(len);
            for (i, x) in data.iter_mut().enumerate().take(hi).skip(lo) {
                let d = (i as f64 - c) / s;
                *x += amplitude * (-d * d / 2.0).exp();
            }
        }
    }
    data
}

fn annotate(data: &[f64], sample_rate: f64) -> Annotator {
    let mut annotator = Annotator::new(DetectionConfig::new(), filters()).unwrap();
    annotator.detect_qrs(data, sample_rate).unwrap();
    annotator.label_ectopic(sample_rate);
    annotator.annotate_waves(data, sample_rate).unwrap();
    annotator
}

#[test]
fn full_list_is_ordered_and_keeps_every_beat() {
    let sr = 360.0;
    let data = ecg(sr, 0.8, 10);
    let annotator = annotate(&data, sr);
    assert_eq!(annotator.qrs_count(), 11);

    let full = annotator.annotations();
    assert!(full.len() >= annotator.qrs_annotations().len());
    for w in full.windows(2) {
        assert!(w[0].offset <= w[1].offset, "{:?} before {:?}", w[0], w[1]);
    }
    for qrs in annotator.qrs_annotations() {
        assert!(full.contains(qrs), "missing {qrs:?}");
    }
    assert!(full.iter().all(|a| a.offset < data.len()));
}

#[test]
fn waves_come_in_triples() {
    let sr = 360.0;
    let data = ecg(sr, 0.8, 10);
    let annotator = annotate(&data, sr);
    let full = annotator.annotations();
    let mut triples = 0;
    for (i, a) in full.iter().enumerate() {
        if let Label::Wave { wave, point } = a.label {
            if point == WavePoint::Onset {
                triples += 1;
                assert_eq!(
                    full[i + 1].label,
                    Label::Wave {
                        wave,
                        point: WavePoint::Peak
                    }
                );
                assert_eq!(
                    full[i + 2].label,
                    Label::Wave {
                        wave,
                        point: WavePoint::Offset
                    }
                );
            }
        }
    }
    assert_eq!(triples, 18);
}

fn wave_onsets(full: &[Annotation], wave: WaveKind) -> usize {
    let onset = Label::Wave {
        wave,
        point: WavePoint::Onset,
    };
    full.iter().filter(|a| a.label == onset).count()
}

fn sub_peaks(full: &[Annotation], kind: SubPeakKind) -> usize {
    full.iter()
        .filter(|a| matches!(a.label, Label::SubPeak { peak, .. } if peak == kind))
        .count()
}

#[test]
fn clean_rhythm_annotates_every_wave() {
    for sr in [250.0, 360.0, 500.0] {
        let data = ecg(sr, 0.8, 10);
        let annotator = annotate(&data, sr);
        let full = annotator.annotations();
        assert_eq!(annotator.qrs_count(), 11, "sr {sr}");
        assert_eq!(wave_onsets(full, WaveKind::T), 9, "sr {sr}");
        assert_eq!(wave_onsets(full, WaveKind::P), 9, "sr {sr}");
        assert_eq!(sub_peaks(full, SubPeakKind::R), 11, "sr {sr}");
        assert!(annotator.noise_markers().is_empty());
        assert!(
            full.iter()
                .all(|a| a.label != Label::Artifact && a.label != Label::Noise)
        );
    }
}

#[test]
fn trailing_t_wave_is_taken_for_a_beat() {
    // The last T wave sits alone in the final threshold window, so it
    // survives shrinkage and is segmented as an eleventh complex.
    for sr in [250.0, 360.0, 500.0] {
        let data = ecg(sr, 0.8, 10);
        let annotator = annotate(&data, sr);
        let qrs = annotator.qrs_annotations();
        let (onset, end) = (qrs[20].offset, qrs[21].offset);
        let last_r = (0.5 + 9.0 * 0.8) * sr;
        let last_t = last_r + 0.3 * sr;
        assert!(
            (onset as f64 - last_t).abs() < 0.1 * sr,
            "sr {sr}: extra onset {onset}, T peak {last_t}"
        );
        assert!(end > onset && end as f64 - onset as f64 <= 0.2 * sr);

        // Too close to the real beat for a wave search in between.
        let real_end = qrs[19].offset;
        assert!(
            !annotator
                .annotations()
                .iter()
                .any(|a| matches!(a.label, Label::Wave { .. }) && a.offset > real_end)
        );
    }
}

#[test]
fn noise_burst_is_annotated_and_suppresses_waves() {
    let sr = 360.0;
    let mut data = ecg(sr, 0.8, 20);
    let mut rng = StdRng::seed_from_u64(11);
    let noise = Normal::new(0.0, 1.0).unwrap();
    for x in &mut data[(6.0 * sr) as usize..(9.0 * sr) as usize] {
        *x += noise.sample(&mut rng);
    }
    let annotator = annotate(&data, sr);
    let beats = annotator.qrs_count();
    assert!((14..20).contains(&beats), "{beats} beats");

    let markers = annotator.noise_markers();
    assert!(!markers.is_empty());
    let full = annotator.annotations();
    for w in full.windows(2) {
        assert!(w[0].offset <= w[1].offset, "{:?} before {:?}", w[0], w[1]);
    }

    let noise: Vec<usize> = full
        .iter()
        .filter(|a| a.label == Label::Noise)
        .map(|a| a.offset)
        .collect();
    assert!(!noise.is_empty());
    for &m in &noise {
        assert!(markers.contains(&m));
        assert!(m as f64 > 5.5 * sr && (m as f64) < 9.0 * sr, "noise at {m}");
    }

    let qrs = annotator.qrs_annotations();
    for &m in markers {
        let Some(end) = qrs
            .iter()
            .rev()
            .find(|a| a.label == Label::QrsEnd && a.offset < m)
            .map(|a| a.offset)
        else {
            continue;
        };
        let next = qrs
            .iter()
            .find(|a| a.label != Label::QrsEnd && a.offset > m)
            .map_or(usize::MAX, |a| a.offset);
        assert!(
            !full
                .iter()
                .any(|a| matches!(a.label, Label::Wave { .. }) && a.offset > end && a.offset < next),
            "wave in the noisy gap {end}..{next}"
        );
    }
}

#[test]
fn beats_without_sub_peaks_become_artifacts_without_waves() {
    let sr = 360.0;
    let data = ecg(sr, 0.8, 10);
    assert!(
        annotate(&data, sr)
            .annotations()
            .iter()
            .any(|a| matches!(a.label, Label::Wave { .. }))
    );

    let config = DetectionConfig::new().with_min_amplitude(5.0);
    let mut annotator = Annotator::new(config, filters()).unwrap();
    annotator.detect_qrs(&data, sr).unwrap();
    annotator.annotate_waves(&data, sr).unwrap();
    let beats = annotator.qrs_count();
    assert_eq!(beats, 11);

    let full = annotator.annotations();
    assert_eq!(full.len(), 2 * beats);
    for pair in full.chunks_exact(2) {
        assert_eq!(pair[0].label, Label::Artifact);
        assert_eq!(pair[1].label, Label::QrsEnd);
    }
    assert!(
        annotator
            .qrs_annotations()
            .iter()
            .step_by(2)
            .all(|a| a.label == Label::Artifact)
    );
}

#[test]
fn annotation_is_deterministic() {
    let sr = 250.0;
    let data = ecg(sr, 1.0, 8);
    let first = annotate(&data, sr).annotations().to_vec();
    let second = annotate(&data, sr).annotations().to_vec();
    assert_eq!(first, second);
}

#[test]
fn saved_file_reads_back() {
    let sr = 360.0;
    let data = ecg(sr, 0.8, 10);
    let annotator = annotate(&data, sr);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.atr");
    annotator.save(&path).unwrap();
    assert_eq!(load_annotations(&path).unwrap(), annotator.annotations());
}

#[test]
fn qrs_list_is_saved_without_waves() {
    let sr = 360.0;
    let data = ecg(sr, 0.8, 10);
    let mut annotator = Annotator::new(DetectionConfig::new(), filters()).unwrap();
    annotator.detect_qrs(&data, sr).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.atr");
    annotator.save(&path).unwrap();
    assert_eq!(
        load_annotations(&path).unwrap(),
        annotator.qrs_annotations()
    );
}

#[test]
fn heart_rate_stays_in_range() {
    let sr = 360.0;
    let data = ecg(sr, 0.8, 10);
    let annotator = annotate(&data, sr);
    let rr = annotator.rr_sequence(annotator.annotations(), sr);
    assert_eq!(rr.values.len(), rr.positions.len());
    let (lo, hi) = (annotator.config().min_bpm(), annotator.effective_max_bpm());
    for &bpm in &rr.values {
        assert!(bpm >= lo && bpm <= hi, "bpm {bpm}");
    }
    for w in rr.positions.windows(2) {
        assert!(w[0] < w[1]);
    }
}

#[test]
fn offset_moves_both_lists() {
    let sr = 360.0;
    let data = ecg(sr, 0.8, 10);
    let mut annotator = annotate(&data, sr);
    let before = annotator.annotations().to_vec();
    annotator.add_annotation_offset(1000).unwrap();
    for (a, b) in annotator.annotations().iter().zip(&before) {
        assert_eq!(a.offset, b.offset + 1000);
        assert_eq!(a.label, b.label);
    }
    assert!(annotator.add_annotation_offset(-1_000_000).is_err());
    assert_eq!(annotator.annotations()[0].offset, before[0].offset + 1000);
}

#[test]
fn noisy_signal_stays_ordered() {
    let sr = 360.0;
    let mut data = ecg(sr, 0.8, 10);
    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.01).unwrap();
    for x in &mut data {
        *x += noise.sample(&mut rng);
    }
    let annotator = annotate(&data, sr);
    for w in annotator.annotations().windows(2) {
        assert!(w[0].offset <= w[1].offset);
    }
}
