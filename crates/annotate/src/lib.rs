//! # ecgann-annotate
//!
//! Beat-by-beat annotation of a single-lead ECG: QRS boundaries, ectopic
//! beats, P/T waves and q/r/s sub-peaks, plus heart-rate extraction and the
//! compact binary annotation format.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph TD
//!     A["&[f64] signal"] -->|"detect_qrs"| B["QRS list (N, ')')"]
//!     B -->|"label_ectopic"| B
//!     B -->|"annotate_waves"| C["full list"]
//!     A -->|"annotate_waves"| C
//!     C -->|"rr_sequence"| D["RrSeries (bpm)"]
//!     C -->|"save / write_annotations"| E[".atr stream"]
//! ```
//!
//! | Stage | Technique |
//! |-------|-----------|
//! | QRS | Gaussian-1 CWT, hard-thresholded FWT band removal, run segmentation with noise recovery |
//! | Ectopic | RR-interval triples against premature and pause rules |
//! | P/T | low-frequency CWT bracket, zero crossing, symmetry and interval checks |
//! | Sub-peaks | interior extrema of the baseline-corrected QRS window |
//!
//! ## Quick Start
//!
//! ```ignore
//! use ecgann_annotate::{Annotator, DetectionConfig};
//! use ecgann_wavelet::FilterDir;
//!
//! let mut annotator = Annotator::new(DetectionConfig::new(), FilterDir::new("filters"))?;
//! annotator.detect_qrs(&signal, 360.0)?;
//! annotator.label_ectopic(360.0);
//! annotator.annotate_waves(&signal, 360.0)?;
//! let rr = annotator.rr_sequence(annotator.annotations(), 360.0);
//! annotator.save("record.atr")?;
//! ```

mod annotation;
mod annotator;
mod codec;
mod config;
mod ectopic;
mod error;
mod label;
mod peaks;
mod qrs;
mod rr;
mod waves;

pub use annotation::Annotation;
pub use annotator::Annotator;
pub use codec::{load_annotations, read_annotations, save_annotations, write_annotations};
pub use config::{DetectionConfig, EctopicRules, QrsFilter, TWaveShape, WaveRules};
pub use error::AnnotateError;
pub use label::{BeatClass, Label, MarkerKind, SubPeakKind, WaveKind, WavePoint};
pub use rr::RrSeries;
