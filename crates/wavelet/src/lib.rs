//! # ecgann-wavelet
//!
//! Wavelet transforms for ECG feature enhancement and cleanup.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["&[f64]"] -->|"cwt(&data, freq, &config)"| B["Vec&lt;f64&gt; spectrum"]
//!     A -->|"Fwt::new(&data, bank)"| C["Fwt"]
//!     C -->|".transform(J)"| D["[lo | hi_J … hi_1]"]
//!     D -->|"shrink_detail / lo_band_mut"| D
//!     D -->|".synthesis(J)"| C
//!     A -->|"Denoiser::lf_denoise / hf_denoise / lfhf_denoise"| A
//! ```
//!
//! ## Filter Resources
//!
//! | Resource | File | Wavelet |
//! |----------|------|---------|
//! | [`FilterResource::BaselineWander`] | `daub2.flt` | Daubechies D4 |
//! | [`FilterResource::HighFrequency`] | `bior97.flt` | CDF 9/7 |
//! | [`FilterResource::QrsLinear`] | `inter1.flt` | LeGall 5/3 |
//! | [`FilterResource::QrsRidge`] | `bior13.flt` | Biorthogonal 1.3 |
//!
//! ## Quick Start
//!
//! ```ignore
//! use ecgann_wavelet::{CwtConfig, Denoiser, FilterDir, Wavelet, cwt};
//!
//! let config = CwtConfig::new(Wavelet::Gaussian1, 360.0);
//! let enhanced = cwt(&signal, 13.0, &config);
//!
//! let denoiser = Denoiser::new(360.0, FilterDir::new("filters"));
//! denoiser.lfhf_denoise(&mut signal)?;
//! ```

mod cwt;
mod denoise;
mod edge;
mod error;
mod family;
mod filter;
mod fwt;
mod threshold;

pub use cwt::{Boundary, CwtConfig, Kernel, cwt};
pub use denoise::{Denoiser, baseline_levels, high_frequency_levels, shrink_detail};
pub use error::WaveletError;
pub use family::Wavelet;
pub use filter::{Filter, FilterBank, FilterDir, FilterResource};
pub use fwt::{Fwt, hi_lo_numbers, level_sizes};
pub use threshold::{Shrinkage, ThresholdRule, shrink_windows};
