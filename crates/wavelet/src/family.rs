//! Mother-wavelet families for the continuous transform.

use num_complex::Complex;

use crate::error::WaveletError;

/// Modulation frequency shared by the two simple Morlet variants.
#[allow(clippy::approx_constant)]
const MORLET_OMEGA: f64 = 6.28;

/// Normalization of the complex Morlet magnitude, `3.14^{1/4}`.
const MORLET_COMPLEX_NORM: f64 = 1.331_166_599_140_369;

/// Closed-form mother wavelets available to [`cwt`](crate::cwt).
///
/// Each family converts a target frequency into a dilation through its own
/// empirical constant (see [`Wavelet::scale`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wavelet {
    /// Mexican hat, `(1 - t²)·e^{-t²/2}`.
    MexicanHat,
    /// Inverse (odd Gaussian), `t·e^{-t²/2}`.
    Inverse,
    /// Real Morlet, `e^{-t²/2}(cos 6.28t - sin 6.28t)`.
    Morlet,
    /// Morlet magnitude, `|e^{-t²/2}·e^{i·6.28t}|`.
    MorletPower,
    /// Complex Morlet with admissibility correction and custom `w0`.
    MorletComplex,
    /// Gaussian, `e^{-t²/2}`.
    Gaussian,
    /// First Gaussian derivative.
    Gaussian1,
    /// Second Gaussian derivative.
    Gaussian2,
    /// Third Gaussian derivative.
    Gaussian3,
    /// Fourth Gaussian derivative.
    Gaussian4,
    /// Fifth Gaussian derivative.
    Gaussian5,
    /// Sixth Gaussian derivative.
    Gaussian6,
    /// Seventh Gaussian derivative.
    Gaussian7,
}

impl Wavelet {
    /// Every supported family, in legacy index order.
    pub const ALL: [Wavelet; 13] = [
        Self::MexicanHat,
        Self::Inverse,
        Self::Morlet,
        Self::MorletPower,
        Self::MorletComplex,
        Self::Gaussian,
        Self::Gaussian1,
        Self::Gaussian2,
        Self::Gaussian3,
        Self::Gaussian4,
        Self::Gaussian5,
        Self::Gaussian6,
        Self::Gaussian7,
    ];

    /// Parses a family name (`mhat`, `inv`, `morl`, `morlpow`, `morlfull`,
    /// `gaus`, `gaus1` … `gaus7`), case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::UnsupportedWavelet`] for any other name.
    pub fn from_name(name: &str) -> Result<Self, WaveletError> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|w| w.name() == lower)
            .ok_or_else(|| WaveletError::UnsupportedWavelet(name.to_string()))
    }

    /// Short lowercase family name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MexicanHat => "mhat",
            Self::Inverse => "inv",
            Self::Morlet => "morl",
            Self::MorletPower => "morlpow",
            Self::MorletComplex => "morlfull",
            Self::Gaussian => "gaus",
            Self::Gaussian1 => "gaus1",
            Self::Gaussian2 => "gaus2",
            Self::Gaussian3 => "gaus3",
            Self::Gaussian4 => "gaus4",
            Self::Gaussian5 => "gaus5",
            Self::Gaussian6 => "gaus6",
            Self::Gaussian7 => "gaus7",
        }
    }

    /// Whether the kernel has an imaginary part that is folded into a
    /// magnitude after correlation.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::MorletPower | Self::MorletComplex)
    }

    /// Converts a target frequency (Hz) into a dilation in samples.
    pub fn scale(&self, frequency: f64, sample_rate: f64, w0: f64) -> f64 {
        let k = match self {
            Self::MexicanHat => 0.22222 * sample_rate,
            Self::Inverse => 0.15833 * sample_rate,
            Self::Morlet | Self::MorletPower => sample_rate,
            Self::MorletComplex => sample_rate * w0 * 0.1589,
            Self::Gaussian => 0.2 * sample_rate,
            Self::Gaussian1 => 0.16 * sample_rate,
            Self::Gaussian2 => 0.224 * sample_rate,
            Self::Gaussian3 => 0.272 * sample_rate,
            Self::Gaussian4 => 0.316 * sample_rate,
            Self::Gaussian5 => 0.354 * sample_rate,
            Self::Gaussian6 => 0.388 * sample_rate,
            Self::Gaussian7 => 0.42 * sample_rate,
        };
        k / frequency
    }

    /// Evaluates the kernel at dimensionless time `t`.
    ///
    /// Real families return a zero imaginary part.
    pub fn evaluate(&self, t: f64, w0: f64) -> Complex<f64> {
        let t2 = t * t;
        let g = (-t2 / 2.0).exp();
        let re = match self {
            Self::MexicanHat => g * (1.0 - t2),
            Self::Inverse => t * g,
            Self::Morlet => {
                let (sn, cs) = (MORLET_OMEGA * t).sin_cos();
                g * (cs - sn)
            }
            Self::MorletPower => {
                let (sn, cs) = (MORLET_OMEGA * t).sin_cos();
                return Complex::new(g * cs, g * sn);
            }
            Self::MorletComplex => {
                let (sn, cs) = (w0 * t).sin_cos();
                let correction = (-w0 * w0 / 2.0).exp();
                return Complex::new(g * (cs - correction), g * (sn - correction));
            }
            Self::Gaussian => g,
            Self::Gaussian1 => -t * g,
            Self::Gaussian2 => (t2 - 1.0) * g,
            Self::Gaussian3 => (3.0 * t - t2 * t) * g,
            Self::Gaussian4 => (3.0 - 6.0 * t2 + t2 * t2) * g,
            Self::Gaussian5 => (-15.0 * t + 10.0 * t2 * t - t2 * t2 * t) * g,
            Self::Gaussian6 => (-15.0 + 45.0 * t2 - 15.0 * t2 * t2 + t2 * t2 * t2) * g,
            Self::Gaussian7 => {
                (105.0 * t - 105.0 * t2 * t + 21.0 * t2 * t2 * t - t2 * t2 * t2 * t) * g
            }
        };
        Complex::new(re, 0.0)
    }

    /// Folds an accumulated correlation into the family's output value,
    /// before the `1/√scale` factor.
    pub(crate) fn finish(&self, acc: Complex<f64>) -> f64 {
        match self {
            Self::Morlet => acc.re / MORLET_OMEGA.sqrt(),
            Self::MorletPower => acc.norm() / MORLET_OMEGA.sqrt(),
            Self::MorletComplex => acc.norm() / MORLET_COMPLEX_NORM,
            _ => acc.re,
        }
    }
}

impl std::fmt::Display for Wavelet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn names_round_trip() {
        for w in Wavelet::ALL {
            assert_eq!(Wavelet::from_name(w.name()).unwrap(), w);
        }
        assert_eq!(Wavelet::from_name("GAUS1").unwrap(), Wavelet::Gaussian1);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = Wavelet::from_name("db4").unwrap_err();
        assert!(matches!(err, WaveletError::UnsupportedWavelet(ref s) if s == "db4"));
    }

    #[test]
    fn scale_uses_family_constant() {
        assert_relative_eq!(
            Wavelet::Gaussian1.scale(13.0, 250.0, 0.0),
            0.16 * 250.0 / 13.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            Wavelet::MexicanHat.scale(10.0, 360.0, 0.0),
            0.22222 * 36.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            Wavelet::MorletComplex.scale(5.0, 100.0, 5.336),
            100.0 * 5.336 * 0.1589 / 5.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn odd_derivatives_vanish_at_origin() {
        for w in [
            Wavelet::Inverse,
            Wavelet::Gaussian1,
            Wavelet::Gaussian3,
            Wavelet::Gaussian5,
            Wavelet::Gaussian7,
        ] {
            assert_eq!(w.evaluate(0.0, 0.0).re, 0.0, "{w}");
        }
    }

    #[test]
    fn even_kernels_are_symmetric() {
        for w in [
            Wavelet::MexicanHat,
            Wavelet::Gaussian,
            Wavelet::Gaussian2,
            Wavelet::Gaussian4,
            Wavelet::Gaussian6,
        ] {
            assert_relative_eq!(
                w.evaluate(1.3, 0.0).re,
                w.evaluate(-1.3, 0.0).re,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn only_two_families_are_complex() {
        let complex: Vec<_> = Wavelet::ALL.into_iter().filter(|w| w.is_complex()).collect();
        assert_eq!(complex, vec![Wavelet::MorletPower, Wavelet::MorletComplex]);
    }
}
