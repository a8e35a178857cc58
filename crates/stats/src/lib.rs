//! Statistical helper functions for the ecgann workspace.
//!
//! Everything here is a pure function over `&[f64]`; the wavelet and
//! annotation crates call into it for thresholds, extremum searches, and
//! range renormalization.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Minimum and maximum of a slice, or `None` if it is empty.
///
/// NaN values never win a comparison and are therefore skipped unless the
/// slice holds nothing else.
pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    let (&first, rest) = data.split_first()?;
    Some(rest.iter().fold((first, first), |(lo, hi), &x| {
        (if x < lo { x } else { lo }, if x > hi { x } else { hi })
    }))
}

/// Linearly maps `data` in place so that its own min/max become `lo`/`hi`.
///
/// A constant slice is mapped onto `lo`.
pub fn normalize_by_min_max(data: &mut [f64], lo: f64, hi: f64) {
    let Some((min, max)) = min_max(data) else {
        return;
    };
    let span = max - min;
    if span == 0.0 {
        data.fill(lo);
        return;
    }
    let k = (hi - lo) / span;
    for x in data.iter_mut() {
        *x = (*x - min) * k + lo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sd(&data), 2.138090, epsilon = 1e-6);
    }

    #[test]
    fn test_sd_single() {
        assert_eq!(sd(&[5.0]), 0.0);
    }

    #[test]
    fn test_variance_two() {
        assert_relative_eq!(variance(&[3.0, 7.0]), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.5, 8.0, 0.0]), Some((-1.5, 8.0)));
        assert_eq!(min_max(&[4.0]), Some((4.0, 4.0)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn test_normalize_by_min_max() {
        let mut data = [0.0, 5.0, 10.0];
        normalize_by_min_max(&mut data, -1.0, 1.0);
        assert_relative_eq!(data[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(data[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(data[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_constant_maps_to_lower_bound() {
        let mut data = [2.0; 4];
        normalize_by_min_max(&mut data, 0.5, 3.0);
        assert!(data.iter().all(|&x| x == 0.5));
    }
}
