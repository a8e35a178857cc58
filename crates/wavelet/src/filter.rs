//! Filter banks for the fast wavelet transform.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::WaveletError;

/// Named filter resources shipped in the `filters/` directory.
///
/// # Example
///
/// ```ignore
/// use ecgann_wavelet::{FilterDir, FilterResource};
///
/// let bank = FilterDir::new("filters").load(FilterResource::BaselineWander)?;
/// assert_eq!(bank.analysis_low().len(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterResource {
    /// Daubechies D4, used to strip baseline wander.
    BaselineWander,
    /// CDF 9/7, used for high-frequency denoising.
    HighFrequency,
    /// LeGall 5/3 pair, used after the linear QRS pre-filter.
    QrsLinear,
    /// Biorthogonal 1.3, used after the ridge QRS pre-filter.
    QrsRidge,
}

impl FilterResource {
    /// Every resource the pipeline may load.
    pub const ALL: [FilterResource; 4] = [
        Self::BaselineWander,
        Self::HighFrequency,
        Self::QrsLinear,
        Self::QrsRidge,
    ];

    /// File name of the resource inside a filter directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::BaselineWander => "daub2.flt",
            Self::HighFrequency => "bior97.flt",
            Self::QrsLinear => "inter1.flt",
            Self::QrsRidge => "bior13.flt",
        }
    }
}

/// One finite filter: coefficients plus the index of tap zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    coeffs: Vec<f64>,
    center: usize,
}

impl Filter {
    /// Creates a filter whose tap `center` sits at offset zero.
    pub fn new(coeffs: Vec<f64>, center: usize) -> Self {
        Self { coeffs, center }
    }

    /// Returns the coefficients.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Returns the phase offset.
    pub fn center(&self) -> usize {
        self.center
    }

    /// Returns the number of taps.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Returns `true` if the filter has no taps.
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Iterates `(offset, coefficient)` pairs, offsets relative to the centre.
    pub(crate) fn taps(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        let center = self.center as isize;
        self.coeffs
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i as isize - center, c))
    }
}

/// Analysis and synthesis filter pairs of a biorthogonal wavelet.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterBank {
    analysis_low: Filter,
    analysis_high: Filter,
    synthesis_low: Filter,
    synthesis_high: Filter,
}

impl FilterBank {
    /// Assembles a bank from its four filters.
    pub fn new(
        analysis_low: Filter,
        analysis_high: Filter,
        synthesis_low: Filter,
        synthesis_high: Filter,
    ) -> Self {
        Self {
            analysis_low,
            analysis_high,
            synthesis_low,
            synthesis_high,
        }
    }

    /// Haar pair in the unit-gain convention of the shipped resources.
    pub fn haar() -> Self {
        Self::new(
            Filter::new(vec![0.5, 0.5], 0),
            Filter::new(vec![0.5, -0.5], 0),
            Filter::new(vec![0.5, 0.5], 0),
            Filter::new(vec![0.5, -0.5], 0),
        )
    }

    /// Parses the text layout: four blocks of `length center` followed by
    /// `length` coefficients, in the order analysis-low, analysis-high,
    /// synthesis-low, synthesis-high.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::FilterParse`] when a block is truncated, a
    /// number does not parse, or a centre lies outside its filter.
    pub fn parse(path: impl AsRef<Path>, text: &str) -> Result<Self, WaveletError> {
        let path = path.as_ref();
        let fail = |reason: String| WaveletError::FilterParse {
            path: path.to_path_buf(),
            reason,
        };
        let mut tokens = text.split_whitespace();
        let mut filters = Vec::with_capacity(4);

        for block in 0..4 {
            let mut next = |what: &str| {
                tokens
                    .next()
                    .ok_or_else(|| fail(format!("filter {block}: missing {what}")))
            };
            let len: usize = next("length")?
                .parse()
                .map_err(|e| fail(format!("filter {block}: bad length: {e}")))?;
            let center: usize = next("center")?
                .parse()
                .map_err(|e| fail(format!("filter {block}: bad center: {e}")))?;
            if len == 0 || center >= len {
                return Err(fail(format!(
                    "filter {block}: center {center} outside length {len}"
                )));
            }
            let coeffs = (0..len)
                .map(|i| {
                    next("coefficient")?
                        .parse::<f64>()
                        .map_err(|e| fail(format!("filter {block}: bad coefficient {i}: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            filters.push(Filter::new(coeffs, center));
        }

        let mut it = filters.into_iter();
        match (it.next(), it.next(), it.next(), it.next()) {
            (Some(al), Some(ah), Some(sl), Some(sh)) => Ok(Self::new(al, ah, sl, sh)),
            _ => Err(fail("expected four filters".to_string())),
        }
    }

    /// Reads and parses a filter file.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::FilterNotFound`] if the file cannot be read,
    /// or [`WaveletError::FilterParse`] if its contents are malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WaveletError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|_| WaveletError::FilterNotFound {
            path: path.to_path_buf(),
        })?;
        let bank = Self::parse(path, &text)?;
        debug!(
            path = %path.display(),
            low = bank.analysis_low.len(),
            high = bank.analysis_high.len(),
            "loaded filter bank"
        );
        Ok(bank)
    }

    /// Returns the analysis low-pass filter.
    pub fn analysis_low(&self) -> &Filter {
        &self.analysis_low
    }

    /// Returns the analysis high-pass filter.
    pub fn analysis_high(&self) -> &Filter {
        &self.analysis_high
    }

    /// Returns the synthesis low-pass filter.
    pub fn synthesis_low(&self) -> &Filter {
        &self.synthesis_low
    }

    /// Returns the synthesis high-pass filter.
    pub fn synthesis_high(&self) -> &Filter {
        &self.synthesis_high
    }
}

/// Directory holding the `.flt` resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterDir {
    path: PathBuf,
}

impl Default for FilterDir {
    /// `filters/` relative to the working directory.
    fn default() -> Self {
        Self::new("filters")
    }
}

impl FilterDir {
    /// Creates a new `FilterDir` rooted at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full path of `resource` inside this directory.
    pub fn resolve(&self, resource: FilterResource) -> PathBuf {
        self.path.join(resource.file_name())
    }

    /// Loads `resource` from this directory.
    ///
    /// # Errors
    ///
    /// See [`FilterBank::load`].
    pub fn load(&self, resource: FilterResource) -> Result<FilterBank, WaveletError> {
        FilterBank::load(self.resolve(resource))
    }
}
