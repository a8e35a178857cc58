//! Annotate command: QRS, ectopic and P/T annotation of text signals.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use ecgann_annotate::{Annotation, Annotator, DetectionConfig};
use ecgann_io::{read_text_signal, write_listing, write_rr_series};
use ecgann_wavelet::FilterDir;

use crate::cli::AnnotateArgs;
use crate::config::EcgannConfig;
use crate::convert;

/// Settings shared by every input of one invocation.
struct Options {
    detection: DetectionConfig,
    filters: FilterDir,
    sample_rate: f64,
    lead: usize,
    offset: Option<i64>,
    waves: bool,
}

/// Result of annotating one input.
struct Report {
    annotations: Vec<Annotation>,
    beats: usize,
    ectopic: usize,
    mean_bpm: Option<f64>,
}

/// Run the annotation pipeline over every input, in parallel.
pub fn run(args: AnnotateArgs) -> Result<()> {
    let _cmd = info_span!("annotate").entered();
    let config = EcgannConfig::load(&args.config)?;

    let opts = Options {
        detection: convert::build_detection_config(&config.detection, &config.rules)?,
        filters: FilterDir::new(
            args.filters
                .clone()
                .unwrap_or_else(|| config.filters.dir.clone()),
        ),
        sample_rate: args.sample_rate.unwrap_or(config.signal.sample_rate),
        lead: args.lead.unwrap_or(config.signal.lead),
        offset: args.offset,
        waves: !args.no_waves,
    };
    info!(
        inputs = args.inputs.len(),
        sample_rate = opts.sample_rate,
        lead = opts.lead,
        "annotating"
    );

    let reports: Vec<Result<Report>> = args
        .inputs
        .par_iter()
        .map(|input| {
            annotate_one(input, &opts)
                .with_context(|| format!("failed to annotate {}", input.display()))
        })
        .collect();

    let mut out = io::stdout().lock();
    for (input, report) in args.inputs.iter().zip(reports) {
        let report = report?;
        writeln!(out, "{}: {} beats, {} ectopic", input.display(), report.beats, report.ectopic)?;
        write_listing(&mut out, &report.annotations, opts.sample_rate)?;
        if let Some(bpm) = report.mean_bpm {
            writeln!(out, "mean heart rate: {bpm:.2}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn annotate_one(input: &Path, opts: &Options) -> Result<Report> {
    let _record = info_span!("record", path = %input.display()).entered();
    let sr = opts.sample_rate;

    let data = read_text_signal(input, opts.lead)?;
    let mut annotator = Annotator::new(opts.detection.clone(), opts.filters.clone())?;
    annotator.detect_qrs(&data, sr)?;
    let beats = annotator.qrs_count();
    if beats == 0 {
        warn!("no QRS complexes found");
    }
    let ectopic = annotator.label_ectopic(sr);
    if opts.waves {
        annotator.annotate_waves(&data, sr)?;
        if annotator.annotations().is_empty() && beats > 0 {
            warn!("wave annotation produced nothing, keeping QRS annotations");
        }
    }

    let rr = if annotator.annotations().is_empty() {
        annotator.rr_sequence(annotator.qrs_annotations(), sr)
    } else {
        annotator.rr_sequence(annotator.annotations(), sr)
    };
    let mean_bpm = if rr.is_empty() {
        warn!("no usable RR intervals");
        None
    } else {
        let mean = rr.mean_bpm();
        info!(
            intervals = rr.len(),
            mean_bpm = mean,
            sd_bpm = ecgann_stats::sd(&rr.values),
            "heart rate"
        );
        write_rr_series(&input.with_extension("hrv"), &rr.values)?;
        Some(mean)
    };

    if let Some(delta) = opts.offset {
        annotator.add_annotation_offset(delta)?;
    }
    annotator.save(input.with_extension("atr"))?;

    let annotations = if annotator.annotations().is_empty() {
        annotator.qrs_annotations().to_vec()
    } else {
        annotator.annotations().to_vec()
    };
    Ok(Report {
        annotations,
        beats,
        ectopic,
        mean_bpm,
    })
}
