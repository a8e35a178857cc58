//! Error types for the ecgann-annotate crate.

use std::path::PathBuf;

use ecgann_wavelet::WaveletError;

/// Error type for all fallible operations in the ecgann-annotate crate.
///
/// Detection never fails because of the signal itself: a flat, short or
/// noisy recording yields an empty annotation list. Errors come from bad
/// parameters, missing filter resources and malformed annotation files.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnnotateError {
    /// Returned when a configuration field is out of range.
    #[error("invalid configuration field {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the sample rate is not a positive finite number.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// Wrapped error from the wavelet crate.
    #[error(transparent)]
    Wavelet(#[from] WaveletError),

    /// Returned when stored QRS annotations point past the end of the signal
    /// handed to wave annotation.
    #[error("annotation offset {offset} is outside a signal of {len} samples")]
    SignalMismatch {
        /// The out-of-range offset.
        offset: usize,
        /// Length of the signal.
        len: usize,
    },

    /// Returned when shifting an annotation would move it before sample 0.
    #[error("offset {offset} shifted by {delta} would be negative")]
    OffsetUnderflow {
        /// Offset of the first annotation that would underflow.
        offset: usize,
        /// Requested shift.
        delta: i64,
    },

    /// Returned when an offset or gap does not fit the 32-bit field of the
    /// annotation format.
    #[error("offset {offset} does not fit the annotation format")]
    OffsetTooLarge {
        /// The offending offset.
        offset: usize,
    },

    /// Returned when annotation offsets decrease.
    #[error("annotation offsets decrease at record {index}")]
    UnsortedOffsets {
        /// Index of the record whose offset is smaller than its predecessor.
        index: usize,
    },

    /// Returned when a decoded record carries a type code outside the table.
    #[error("unknown annotation code {code} at record {index}")]
    UnknownCode {
        /// The decoded type code.
        code: u16,
        /// Index of the record.
        index: usize,
    },

    /// Returned when the stream ends before its terminator.
    #[error("annotation stream truncated at record {index}")]
    TruncatedStream {
        /// Number of complete records read before the stream ended.
        index: usize,
    },

    /// Returned when reading or writing an annotation stream fails.
    #[error("annotation stream error: {reason}")]
    Stream {
        /// Description of the underlying I/O failure.
        reason: String,
    },

    /// Returned when an annotation file cannot be created or opened.
    #[error("annotation file {}: {reason}", path.display())]
    File {
        /// Path of the file.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let err = AnnotateError::InvalidConfig {
            field: "max_bpm".into(),
            reason: "must exceed min_bpm".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration field max_bpm: must exceed min_bpm"
        );
    }

    #[test]
    fn error_offset_underflow() {
        let err = AnnotateError::OffsetUnderflow {
            offset: 12,
            delta: -20,
        };
        assert_eq!(err.to_string(), "offset 12 shifted by -20 would be negative");
    }

    #[test]
    fn error_signal_mismatch() {
        let err = AnnotateError::SignalMismatch {
            offset: 5000,
            len: 3600,
        };
        assert_eq!(
            err.to_string(),
            "annotation offset 5000 is outside a signal of 3600 samples"
        );
    }

    #[test]
    fn error_unknown_code() {
        let err = AnnotateError::UnknownCode { code: 59, index: 3 };
        assert_eq!(err.to_string(), "unknown annotation code 59 at record 3");
    }

    #[test]
    fn error_truncated_stream() {
        let err = AnnotateError::TruncatedStream { index: 7 };
        assert_eq!(err.to_string(), "annotation stream truncated at record 7");
    }

    #[test]
    fn error_wraps_wavelet() {
        let err: AnnotateError = WaveletError::UnsupportedWavelet("db9".into()).into();
        assert_eq!(err.to_string(), "unsupported wavelet family: db9");
    }

    #[test]
    fn error_file() {
        let err = AnnotateError::File {
            path: PathBuf::from("out/rec.atr"),
            reason: "permission denied".into(),
        };
        assert_eq!(err.to_string(), "annotation file out/rec.atr: permission denied");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<AnnotateError>();
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<AnnotateError>();
    }
}
