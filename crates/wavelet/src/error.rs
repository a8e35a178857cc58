//! Error types for the ecgann-wavelet crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the ecgann-wavelet crate.
///
/// Transforms themselves never fail; errors come from loading filter
/// resources and from rejecting parameters that make a decomposition
/// meaningless.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaveletError {
    /// Returned when a filter resource cannot be opened.
    #[error("filter resource not found: {}", path.display())]
    FilterNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Returned when a filter resource does not follow the
    /// `length center coeffs...` layout.
    #[error("malformed filter resource {}: {reason}", path.display())]
    FilterParse {
        /// Resource that was being parsed.
        path: PathBuf,
        /// What went wrong while parsing.
        reason: String,
    },

    /// Returned when an unsupported wavelet family name is provided.
    #[error("unsupported wavelet family: {0}")]
    UnsupportedWavelet(String),

    /// Returned when a threshold rule or shrinkage name is not recognised.
    #[error("unsupported threshold setting: {0}")]
    UnsupportedThreshold(String),

    /// Returned when the sample rate is not a positive finite number.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),
}
