//! Decode command: print the listing of a binary annotation file.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use ecgann_annotate::load_annotations;
use ecgann_io::write_listing;

use crate::cli::DecodeArgs;
use crate::config::EcgannConfig;

/// Run the decode command.
pub fn run(args: DecodeArgs) -> Result<()> {
    let _cmd = info_span!("decode").entered();
    let config = EcgannConfig::load(&args.config)?;
    let sample_rate = args.sample_rate.unwrap_or(config.signal.sample_rate);

    let annotations = load_annotations(&args.annotations)
        .with_context(|| format!("failed to decode {}", args.annotations.display()))?;
    info!(records = annotations.len(), "annotations decoded");

    let mut out = io::stdout().lock();
    write_listing(&mut out, &annotations, sample_rate)?;
    out.flush()?;
    Ok(())
}
