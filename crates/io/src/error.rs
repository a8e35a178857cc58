//! Error types for ecgann-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the ecgann-io crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IoError {
    /// Returned when an input file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when an input file exists but cannot be read.
    #[error("failed to read {}: {reason}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        reason: String,
    },

    /// Returned when a token is not a number.
    #[error("{}:{line}: cannot parse '{token}' as a sample", path.display())]
    Parse {
        /// Path being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// Returned when an output file cannot be created or written.
    #[error("failed to write {}: {reason}", path.display())]
    Write {
        /// Path being written, empty for in-memory writers.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        reason: String,
    },

    /// Returned when a signal holds fewer samples than analysis needs.
    #[error("{}: {got} sample(s), at least {min} required", path.display())]
    TooShort {
        /// Path being read.
        path: PathBuf,
        /// Samples found.
        got: usize,
        /// Minimum accepted.
        min: usize,
    },

    /// Returned when a row has no column for the requested lead.
    #[error("{}:{line}: lead {lead} requested, row has {columns} column(s)", path.display())]
    LeadOutOfRange {
        /// Path being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// 1-based lead requested.
        lead: usize,
        /// Columns present on the row.
        columns: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.txt"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.txt");
    }

    #[test]
    fn display_parse() {
        let err = IoError::Parse {
            path: PathBuf::from("rec.txt"),
            line: 7,
            token: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "rec.txt:7: cannot parse 'abc' as a sample");
    }

    #[test]
    fn display_too_short() {
        let err = IoError::TooShort {
            path: PathBuf::from("rec.txt"),
            got: 1,
            min: 2,
        };
        assert_eq!(err.to_string(), "rec.txt: 1 sample(s), at least 2 required");
    }

    #[test]
    fn display_lead_out_of_range() {
        let err = IoError::LeadOutOfRange {
            path: PathBuf::from("rec.txt"),
            line: 3,
            lead: 4,
            columns: 2,
        };
        assert_eq!(
            err.to_string(),
            "rec.txt:3: lead 4 requested, row has 2 column(s)"
        );
    }

    #[test]
    fn display_write() {
        let err = IoError::Write {
            path: PathBuf::from("/out/rec.hrv"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to write /out/rec.hrv: permission denied"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
