//! Multi-level Fast Wavelet Transform (FWT).
//!
//! Each analysis level splits the current low band into a half-size low band
//! (kept at the front of the spectrum) and a half-size high band (stacked
//! from the back), so after `J` levels the spectrum reads
//! `[lo | hi_J | … | hi_1]`. Synthesis walks the same stack in reverse.

use std::ops::Range;

use tracing::debug;

use crate::edge::fold;
use crate::filter::{Filter, FilterBank};

/// In-place multi-level analysis/synthesis over one signal.
///
/// # Example
///
/// ```ignore
/// use ecgann_wavelet::{FilterBank, Fwt};
///
/// let mut fwt = Fwt::new(&signal, FilterBank::haar());
/// fwt.transform(3);
/// fwt.lo_band_mut().fill(0.0);
/// fwt.synthesis(3);
/// let detail = fwt.into_spectrum();
/// ```
#[derive(Clone, Debug)]
pub struct Fwt {
    bank: FilterBank,
    spectrum: Vec<f64>,
    lo_size: usize,
    /// High bands written so far, finest first.
    bands: Vec<Range<usize>>,
}

impl Fwt {
    /// Copies `data` into a fresh spectrum.
    pub fn new(data: &[f64], bank: FilterBank) -> Self {
        debug!(n = data.len(), "fwt init");
        Self {
            bank,
            spectrum: data.to_vec(),
            lo_size: data.len(),
            bands: Vec::new(),
        }
    }

    /// Applies up to `levels` analysis steps.
    ///
    /// Stops early once the low band holds fewer than two samples.
    pub fn transform(&mut self, levels: usize) {
        for _ in 0..levels {
            let lo = self.lo_size;
            if lo < 2 {
                break;
            }
            let half = lo / 2;
            let hi_start = self.bands.last().map_or(self.spectrum.len(), |b| b.start) - half;

            let input = &self.spectrum[..lo];
            let low = analyse(input, self.bank.analysis_low(), half);
            let high = analyse(input, self.bank.analysis_high(), half);

            self.spectrum[..half].copy_from_slice(&low);
            self.spectrum[hi_start..hi_start + half].copy_from_slice(&high);
            self.bands.push(hi_start..hi_start + half);
            self.lo_size = half;
        }
    }

    /// Inverts up to `levels` of the applied analysis steps.
    pub fn synthesis(&mut self, levels: usize) {
        for _ in 0..levels {
            let Some(band) = self.bands.pop() else {
                break;
            };
            let lo = self.lo_size;
            let low = self.spectrum[..lo].to_vec();
            let high = self.spectrum[band].to_vec();

            let mut even = vec![0.0; lo];
            let mut odd = vec![0.0; lo];
            interpolate(&low, self.bank.synthesis_low(), &mut even, &mut odd);
            interpolate(&high, self.bank.synthesis_high(), &mut even, &mut odd);

            for k in 0..lo {
                self.spectrum[2 * k] = 2.0 * even[k];
                self.spectrum[2 * k + 1] = 2.0 * odd[k];
            }
            self.lo_size = 2 * lo;
        }
    }

    /// Number of analysis levels currently applied.
    pub fn levels(&self) -> usize {
        self.bands.len()
    }

    /// Size of the current low band (the reconstructed prefix after a full
    /// synthesis).
    pub fn lo_band_size(&self) -> usize {
        self.lo_size
    }

    /// Returns the whole spectrum.
    pub fn spectrum(&self) -> &[f64] {
        &self.spectrum
    }

    /// Returns the whole spectrum mutably.
    pub fn spectrum_mut(&mut self) -> &mut [f64] {
        &mut self.spectrum
    }

    /// Returns the current low band mutably.
    pub fn lo_band_mut(&mut self) -> &mut [f64] {
        &mut self.spectrum[..self.lo_size]
    }

    /// Returns the high band of `level` (1 = finest), if that level has been
    /// applied.
    pub fn high_band(&self, level: usize) -> Option<&[f64]> {
        let range = self.bands.get(level.checked_sub(1)?)?.clone();
        Some(&self.spectrum[range])
    }

    /// Mutable variant of [`Fwt::high_band`].
    pub fn high_band_mut(&mut self, level: usize) -> Option<&mut [f64]> {
        let range = self.bands.get(level.checked_sub(1)?)?.clone();
        Some(&mut self.spectrum[range])
    }

    /// Consumes the transform and returns its spectrum.
    pub fn into_spectrum(self) -> Vec<f64> {
        self.spectrum
    }
}

fn analyse(input: &[f64], filter: &Filter, half: usize) -> Vec<f64> {
    let lo = input.len();
    (0..half)
        .map(|k| {
            filter
                .taps()
                .map(|(o, c)| c * input[fold(2 * k as isize + o, lo)])
                .sum()
        })
        .collect()
}

fn interpolate(band: &[f64], filter: &Filter, even: &mut [f64], odd: &mut [f64]) {
    let lo = band.len();
    for (o, c) in filter.taps() {
        let (m, out) = if o.rem_euclid(2) == 0 {
            (o / 2, &mut *even)
        } else {
            ((o - 1).div_euclid(2), &mut *odd)
        };
        for (k, v) in out.iter_mut().enumerate() {
            *v += c * band[fold(k as isize - m, lo)];
        }
    }
}

/// High-band sizes for a `levels`-deep decomposition of `n` samples, in
/// spectrum order (`hi_J` first, `hi_1` last).
pub fn level_sizes(levels: usize, n: usize) -> Vec<usize> {
    (0..levels).map(|i| n >> (levels - i)).collect()
}

/// Total high-band samples and final low-band size after `levels` halvings
/// of `n`.
pub fn hi_lo_numbers(levels: usize, n: usize) -> (usize, usize) {
    let mut size = n;
    let mut hi = 0;
    for _ in 0..levels {
        size /= 2;
        hi += size;
    }
    (hi, size)
}
