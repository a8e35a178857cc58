//! Plain text signal reader.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::IoError;

/// Fewest samples accepted as a signal.
const MIN_SAMPLES: usize = 2;

/// Read one lead of a whitespace-separated text signal.
///
/// Each non-empty line is one sample row; columns are leads and `lead` is
/// 1-based. Lines starting with `#` are comments.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] or [`IoError::Read`] when the file
/// cannot be read, [`IoError::LeadOutOfRange`] when a row lacks the
/// requested column, [`IoError::Parse`] for a non-numeric sample and
/// [`IoError::TooShort`] for fewer than two samples.
pub fn read_text_signal(path: &Path, lead: usize) -> Result<Vec<f64>, IoError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IoError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => IoError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let mut samples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let row = line.trim();
        if row.is_empty() || row.starts_with('#') {
            continue;
        }
        let columns: Vec<&str> = row.split_whitespace().collect();
        let token = lead
            .checked_sub(1)
            .and_then(|c| columns.get(c))
            .ok_or_else(|| IoError::LeadOutOfRange {
                path: path.to_path_buf(),
                line: index + 1,
                lead,
                columns: columns.len(),
            })?;
        let value = token.parse::<f64>().map_err(|_| IoError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            token: (*token).to_string(),
        })?;
        samples.push(value);
    }

    if samples.len() < MIN_SAMPLES {
        return Err(IoError::TooShort {
            path: path.to_path_buf(),
            got: samples.len(),
            min: MIN_SAMPLES,
        });
    }
    debug!(path = %path.display(), lead, samples = samples.len(), "signal read");
    Ok(samples)
}
