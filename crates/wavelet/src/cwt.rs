//! Single-frequency Continuous Wavelet Transform (CWT).
//!
//! The kernel is generated analytically in the time domain and correlated
//! directly against the signal, so every output sample sees the same edge
//! handling and exact zeros in the input stay exact in the output.

use num_complex::Complex;
use tracing::debug;

use crate::edge::reflect;
use crate::family::Wavelet;

/// Kernel magnitude below which a sample counts towards the cutoff.
const PRECISION: f64 = 1e-7;

/// Number of small kernel samples tolerated before the kernel is truncated.
const PRECISION_RUN: usize = 15;

/// How samples outside the signal are synthesised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// Whole-sample reflection about the first and last sample.
    Reflect,
    /// Constant extension. A zero value falls back to the nearest edge
    /// sample.
    Constant {
        /// Value used left of the signal.
        left: f64,
        /// Value used right of the signal.
        right: f64,
    },
}

impl Default for Boundary {
    fn default() -> Self {
        Self::Reflect
    }
}

/// Configuration for the Continuous Wavelet Transform.
///
/// # Example
///
/// ```ignore
/// use ecgann_wavelet::{CwtConfig, Wavelet, cwt};
///
/// let config = CwtConfig::new(Wavelet::Gaussian1, 360.0);
/// let spectrum = cwt(&signal, 13.0, &config);
/// assert_eq!(spectrum.len(), signal.len());
/// ```
#[derive(Clone, Debug)]
pub struct CwtConfig {
    /// Mother wavelet.
    wavelet: Wavelet,
    /// Sampling rate in Hz.
    sample_rate: f64,
    /// Central frequency of the complex Morlet family.
    w0: f64,
    /// Edge handling.
    boundary: Boundary,
}

impl CwtConfig {
    /// Creates a new `CwtConfig` with reflecting edges and `w0 = 5.336`.
    pub fn new(wavelet: Wavelet, sample_rate: f64) -> Self {
        Self {
            wavelet,
            sample_rate,
            w0: 5.336,
            boundary: Boundary::Reflect,
        }
    }

    /// Sets the complex Morlet central frequency.
    pub fn with_w0(mut self, w0: f64) -> Self {
        self.w0 = w0;
        self
    }

    /// Sets the edge handling.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Returns the mother wavelet.
    pub fn wavelet(&self) -> Wavelet {
        self.wavelet
    }

    /// Returns the sampling rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Returns the complex Morlet central frequency.
    pub fn w0(&self) -> f64 {
        self.w0
    }

    /// Returns the edge handling.
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }
}

/// A sampled kernel spanning offsets `-(support-1)..=(support-1)`.
#[derive(Clone, Debug)]
pub struct Kernel {
    taps: Vec<Complex<f64>>,
    support: usize,
}

impl Kernel {
    /// Samples `wavelet` at the given scale for a signal of `len` samples.
    ///
    /// The positive side is scanned from the centre outwards; every sample
    /// whose real magnitude is below `1e-7` is counted, and once more than
    /// 15 have been seen the kernel is cut at that offset. The count is
    /// cumulative, so zero crossings near the centre contribute to it.
    pub fn generate(wavelet: Wavelet, scale: f64, w0: f64, len: usize) -> Self {
        let mut positive = Vec::with_capacity(len.min(1024));
        let mut small = 0usize;
        let mut support = len;
        for i in 0..len {
            let v = wavelet.evaluate(i as f64 / scale, w0);
            if v.re.abs() < PRECISION {
                small += 1;
            }
            if small > PRECISION_RUN {
                support = i;
                break;
            }
            positive.push(v);
        }

        let mut taps = Vec::with_capacity(2 * support.saturating_sub(1) + 1);
        taps.extend((1..support).rev().map(|i| wavelet.evaluate(-(i as f64) / scale, w0)));
        taps.extend(positive);
        Self { taps, support }
    }

    /// Number of samples on each side of (and including) the centre.
    pub fn support(&self) -> usize {
        self.support
    }

    /// Kernel value at `offset`, zero outside the support.
    pub fn at(&self, offset: isize) -> Complex<f64> {
        let reach = self.support as isize - 1;
        if offset.abs() > reach {
            return Complex::new(0.0, 0.0);
        }
        self.taps[(offset + reach) as usize]
    }
}

/// Computes the CWT of `data` at one target `frequency` (Hz).
///
/// The output has the same length as the input. Complex families are folded
/// into a magnitude; every value is scaled by the family's normalization and
/// by `1/√scale`.
pub fn cwt(data: &[f64], frequency: f64, config: &CwtConfig) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    let wavelet = config.wavelet();
    let scale = wavelet.scale(frequency, config.sample_rate(), config.w0());
    let kernel = Kernel::generate(wavelet, scale, config.w0(), n);
    let reach = kernel.support() as isize - 1;
    let norm = 1.0 / scale.sqrt();
    debug!(
        wavelet = %wavelet,
        frequency,
        scale,
        support = kernel.support(),
        n,
        "cwt"
    );

    (0..n as isize)
        .map(|x| {
            let mut acc = Complex::new(0.0, 0.0);
            for o in -reach..=reach {
                acc += kernel.at(o) * sample_at(data, x + o, config.boundary());
            }
            wavelet.finish(acc) * norm
        })
        .collect()
}

fn sample_at(data: &[f64], t: isize, boundary: Boundary) -> f64 {
    let n = data.len();
    if t >= 0 && (t as usize) < n {
        return data[t as usize];
    }
    match boundary {
        Boundary::Reflect => data[reflect(t, n)],
        Boundary::Constant { left, right } => {
            if t < 0 {
                if left != 0.0 { left } else { data[0] }
            } else if right != 0.0 {
                right
            } else {
                data[n - 1]
            }
        }
    }
}
