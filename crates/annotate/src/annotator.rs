//! Session object tying the detection stages together.

use std::path::Path;

use ecgann_wavelet::{Denoiser, FilterDir};
use tracing::{debug, info, warn};

use crate::annotation::{Annotation, shift_offsets};
use crate::codec::save_annotations;
use crate::config::DetectionConfig;
use crate::ectopic;
use crate::error::AnnotateError;
use crate::label::{Label, WaveKind, WavePoint};
use crate::peaks::{SubPeaks, locate_sub_peaks};
use crate::qrs::{Cycle, prefilter, segment};
use crate::rr::{RrSeries, rr_sequence};
use crate::waves::{Wave, WaveFinder};

/// Beat-by-beat annotator for one recording at a time.
///
/// The stages run in order: [`detect_qrs`](Self::detect_qrs), optionally
/// [`label_ectopic`](Self::label_ectopic), then
/// [`annotate_waves`](Self::annotate_waves). Each stage works on the lists
/// stored by the previous one; running `detect_qrs` again starts over.
///
/// # Example
///
/// ```ignore
/// use ecgann_annotate::{Annotator, DetectionConfig};
/// use ecgann_wavelet::FilterDir;
///
/// let mut annotator = Annotator::new(DetectionConfig::new(), FilterDir::new("filters"))?;
/// annotator.detect_qrs(&signal, 360.0)?;
/// annotator.label_ectopic(360.0);
/// let full = annotator.annotate_waves(&signal, 360.0)?;
/// ```
#[derive(Clone, Debug)]
pub struct Annotator {
    config: DetectionConfig,
    filters: FilterDir,
    effective_max_bpm: f64,
    qrs: Vec<Annotation>,
    noise: Vec<usize>,
    annotations: Vec<Annotation>,
}

fn check_rate(sample_rate: f64) -> Result<(), AnnotateError> {
    if sample_rate.is_finite() && sample_rate >= 1.0 {
        Ok(())
    } else {
        Err(AnnotateError::InvalidSampleRate(sample_rate))
    }
}

fn push_wave(out: &mut Vec<Annotation>, wave: WaveKind, w: &Wave) {
    for (offset, point) in [
        (w.onset, WavePoint::Onset),
        (w.peak, WavePoint::Peak),
        (w.offset, WavePoint::Offset),
    ] {
        out.push(Annotation::new(offset, Label::Wave { wave, point }));
    }
}

impl Annotator {
    /// Creates an annotator after validating `config`.
    pub fn new(config: DetectionConfig, filters: FilterDir) -> Result<Self, AnnotateError> {
        config.validate()?;
        let effective_max_bpm = config.max_bpm();
        Ok(Self {
            config,
            filters,
            effective_max_bpm,
            qrs: Vec::new(),
            noise: Vec::new(),
            annotations: Vec::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Returns the filter directory.
    pub fn filters(&self) -> &FilterDir {
        &self.filters
    }

    /// Maximum heart rate in force after the last [`detect_qrs`](Self::detect_qrs).
    ///
    /// Lower than the configured value when the configured rate leaves no
    /// room between complexes of maximum duration.
    pub fn effective_max_bpm(&self) -> f64 {
        self.effective_max_bpm
    }

    /// Alternating beat-start / QRS-end annotations.
    pub fn qrs_annotations(&self) -> &[Annotation] {
        &self.qrs
    }

    /// Number of detected beats.
    pub fn qrs_count(&self) -> usize {
        self.qrs.len() / 2
    }

    /// Sample positions judged unanalyzable during QRS detection.
    pub fn noise_markers(&self) -> &[usize] {
        &self.noise
    }

    /// Full annotation list from the last [`annotate_waves`](Self::annotate_waves).
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Locates QRS complexes in `data`.
    ///
    /// Replaces every stored list. A signal without detectable complexes
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Fails on an invalid sample rate or an unreadable QRS filter resource.
    pub fn detect_qrs(
        &mut self,
        data: &[f64],
        sample_rate: f64,
    ) -> Result<&[Annotation], AnnotateError> {
        check_rate(sample_rate)?;
        self.qrs.clear();
        self.noise.clear();
        self.annotations.clear();

        let cycle = Cycle::new(self.config.max_bpm(), self.config.max_qrs(), sample_rate);
        if cycle.clamped {
            warn!(
                configured = self.config.max_bpm(),
                effective = cycle.max_bpm,
                "maximum heart rate lowered to fit the QRS duration"
            );
        }
        self.effective_max_bpm = cycle.max_bpm;
        if data.is_empty() {
            return Ok(&self.qrs);
        }

        let filtered = prefilter(data, sample_rate, &self.config, &self.filters)?;
        let segments = segment(
            &filtered,
            sample_rate,
            cycle,
            self.config.min_qrs(),
            self.config.max_qrs(),
        );
        for &(onset, end) in &segments.complexes {
            self.qrs.push(Annotation::new(onset, Label::NORMAL));
            self.qrs.push(Annotation::new(end, Label::QrsEnd));
        }
        self.noise = segments.noise;
        info!(
            beats = self.qrs_count(),
            noise = self.noise.len(),
            "QRS detection complete"
        );
        Ok(&self.qrs)
    }

    /// Relabels beats whose RR pattern marks them as ectopic.
    ///
    /// Returns the number of relabelled beats.
    pub fn label_ectopic(&mut self, sample_rate: f64) -> usize {
        let count = ectopic::label_ectopic(
            &mut self.qrs,
            sample_rate,
            (self.config.min_bpm(), self.effective_max_bpm),
            self.config.ectopic_rules(),
        );
        debug!(ectopic = count, "ectopic labelling complete");
        count
    }

    /// Adds P/T waves and q/r/s sub-peaks around the detected complexes.
    ///
    /// `data` must be the signal passed to [`detect_qrs`](Self::detect_qrs).
    /// Beats whose QRS window holds neither an R nor an S peak are relabelled
    /// as artifacts in the QRS list too.
    ///
    /// # Errors
    ///
    /// Fails on an invalid sample rate or when a stored offset lies outside
    /// `data`. A missing baseline filter only disables the sub-peak search.
    pub fn annotate_waves(
        &mut self,
        data: &[f64],
        sample_rate: f64,
    ) -> Result<&[Annotation], AnnotateError> {
        check_rate(sample_rate)?;
        self.annotations.clear();
        if let Some(bad) = self.qrs.iter().find(|a| a.offset >= data.len()) {
            return Err(AnnotateError::SignalMismatch {
                offset: bad.offset,
                len: data.len(),
            });
        }
        let beats = self.qrs_count();
        if beats == 0 {
            return Ok(&self.annotations);
        }
        let bounds = |n: usize| (self.qrs[2 * n].offset, self.qrs[2 * n + 1].offset);

        let rules = *self.config.wave_rules();
        let finder = WaveFinder::new(data, sample_rate, &self.config);
        let max_wave_bpm = self.effective_max_bpm - rules.bpm_headroom();
        let mut t_waves: Vec<Option<Wave>> = vec![None; beats - 1];
        let mut p_waves: Vec<Option<Wave>> = vec![None; beats - 1];
        let mut cursor = 0;
        for n in 0..beats - 1 {
            let (start, end) = bounds(n);
            let next = self.qrs[2 * n + 2].offset;
            if let Some(k) = (cursor..self.noise.len()).find(|&k| {
                let m = self.noise[k];
                m > end && m < next
            }) {
                cursor = k + 1;
                continue;
            }
            let rate = 60.0 / (next.saturating_sub(start) as f64 / sample_rate);
            if rate < self.config.min_bpm() || rate > max_wave_bpm {
                continue;
            }
            let t = finder.t_wave(start, end, next);
            p_waves[n] = finder.p_wave(end, next, t.map(|w| w.offset));
            t_waves[n] = t;
        }

        let mut buf = data.to_vec();
        let mut peaks = vec![SubPeaks::default(); beats];
        let denoiser = Denoiser::new(sample_rate, self.filters.clone());
        match denoiser.lf_denoise(&mut buf) {
            Ok(()) => {
                for (n, slot) in peaks.iter_mut().enumerate() {
                    let (start, end) = (self.qrs[2 * n].offset, self.qrs[2 * n + 1].offset);
                    match locate_sub_peaks(&buf, start, end, self.config.min_amplitude(), &rules)
                    {
                        Some(found) => *slot = found,
                        None => {
                            self.qrs[2 * n].label = Label::Artifact;
                            if n > 0 {
                                p_waves[n - 1] = None;
                            }
                            if n + 1 < beats {
                                t_waves[n] = None;
                            }
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "sub-peak search skipped"),
        }

        let mut out = Vec::new();
        let push_beat = |out: &mut Vec<Annotation>, n: usize| {
            out.push(self.qrs[2 * n]);
            out.extend(
                peaks[n]
                    .labelled(&buf, rules.large_peak())
                    .into_iter()
                    .map(|(offset, label)| Annotation::new(offset, label)),
            );
            out.push(self.qrs[2 * n + 1]);
        };
        let mut noise_cursor = 0;
        for n in 0..beats - 1 {
            push_beat(&mut out, n);
            if let Some(t) = &t_waves[n] {
                push_wave(&mut out, WaveKind::T, t);
            }
            if let Some(p) = &p_waves[n] {
                push_wave(&mut out, WaveKind::P, p);
            }
            if t_waves[n].is_none() && p_waves[n].is_none() {
                let end = self.qrs[2 * n + 1].offset;
                let next = self.qrs[2 * n + 2].offset;
                if let Some(k) = (noise_cursor..self.noise.len()).find(|&k| {
                    let m = self.noise[k];
                    m > end && m < next
                }) {
                    out.push(Annotation::new(self.noise[k], Label::Noise));
                    noise_cursor = k + 1;
                }
            }
        }
        push_beat(&mut out, beats - 1);
        let last_end = self.qrs[2 * beats - 1].offset;
        if let Some(&m) = self.noise[noise_cursor..].iter().find(|&&m| m > last_end) {
            out.push(Annotation::new(m, Label::Noise));
        }

        info!(
            records = out.len(),
            t_waves = t_waves.iter().flatten().count(),
            p_waves = p_waves.iter().flatten().count(),
            "wave annotation complete"
        );
        self.annotations = out;
        Ok(&self.annotations)
    }

    /// Shifts every stored QRS and full annotation by `delta` samples.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::OffsetUnderflow`] if any offset would become
    /// negative; nothing is changed in that case.
    pub fn add_annotation_offset(&mut self, delta: i64) -> Result<(), AnnotateError> {
        let mut qrs = self.qrs.clone();
        shift_offsets(&mut qrs, delta)?;
        let mut annotations = self.annotations.clone();
        shift_offsets(&mut annotations, delta)?;
        self.qrs = qrs;
        self.annotations = annotations;
        Ok(())
    }

    /// Heart rates between consecutive beats of `annotations`, bounded by
    /// the configured minimum and the effective maximum rate.
    pub fn rr_sequence(&self, annotations: &[Annotation], sample_rate: f64) -> RrSeries {
        rr_sequence(
            annotations,
            sample_rate,
            (self.config.min_bpm(), self.effective_max_bpm),
        )
    }

    /// Writes the full annotation list to `path`, or the QRS list when wave
    /// annotation produced nothing.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AnnotateError> {
        if self.annotations.is_empty() {
            save_annotations(path, &self.qrs)
        } else {
            save_annotations(path, &self.annotations)
        }
    }
}
