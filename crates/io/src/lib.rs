//! # ecgann-io
//!
//! Read ECG samples from plain text files and write the per-record outputs:
//! the heart-rate series (`.hrv`), denoised signals and the human-readable
//! annotation listing. Bridges files into the `&[f64]` slices consumed by
//! `ecgann-annotate` and `ecgann-wavelet`.
//!
//! | Function | Direction | Format |
//! |----------|-----------|--------|
//! | [`read_text_signal`] | in | whitespace-separated numbers, one row per sample, one column per lead |
//! | [`write_rr_series`] | out | one heart rate per line, six decimals |
//! | [`write_signal`] | out | one sample per line, six decimals |
//! | [`write_listing`] | out | `sample hh:mm:ss.mmm mnemonic` per annotation |

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::read_text_signal;
pub use writer::{format_timestamp, write_listing, write_rr_series, write_signal};
