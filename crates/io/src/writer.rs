//! Heart-rate, signal and listing writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ecgann_annotate::Annotation;
use tracing::debug;

use crate::error::IoError;

/// Formats the time of `sample` as `hh:mm:ss.mmm`.
///
/// The time is truncated to whole milliseconds.
pub fn format_timestamp(sample: usize, sample_rate: f64) -> String {
    let total = ((sample as f64 / sample_rate) * 1000.0) as u64;
    let (ms, secs) = (total % 1000, total / 1000);
    let (s, mins) = (secs % 60, secs / 60);
    let (m, h) = (mins % 60, mins / 60);
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Writes one `sample hh:mm:ss.mmm mnemonic` line per annotation.
///
/// # Errors
///
/// Returns [`IoError::Write`] if the writer fails.
pub fn write_listing<W: Write>(
    writer: &mut W,
    annotations: &[Annotation],
    sample_rate: f64,
) -> Result<(), IoError> {
    for a in annotations {
        writeln!(
            writer,
            "{:>10} {}   {}",
            a.offset,
            format_timestamp(a.offset, sample_rate),
            a.label
        )
        .map_err(|e| IoError::Write {
            path: Default::default(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

fn write_lines(path: &Path, values: &[f64]) -> Result<(), IoError> {
    let write_err = |e: std::io::Error| IoError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let mut w = BufWriter::new(File::create(path).map_err(write_err)?);
    for v in values {
        writeln!(w, "{v:.6}").map_err(write_err)?;
    }
    w.flush().map_err(write_err)
}

/// Writes a heart-rate series, one bpm value per line.
///
/// # Errors
///
/// Returns [`IoError::Write`] if the file cannot be created or written.
pub fn write_rr_series(path: &Path, values: &[f64]) -> Result<(), IoError> {
    write_lines(path, values)?;
    debug!(path = %path.display(), intervals = values.len(), "heart-rate series written");
    Ok(())
}

/// Writes a signal, one sample per line.
///
/// # Errors
///
/// Returns [`IoError::Write`] if the file cannot be created or written.
pub fn write_signal(path: &Path, samples: &[f64]) -> Result<(), IoError> {
    write_lines(path, samples)?;
    debug!(path = %path.display(), samples = samples.len(), "signal written");
    Ok(())
}
