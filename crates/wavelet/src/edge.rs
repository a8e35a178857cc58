//! Out-of-range index mapping for the two transforms.

/// Maps a possibly out-of-range index onto `0..len` by reflecting about the
/// first and last samples (`-n` on the left, `2·len − 2 − n` on the right).
///
/// Indices more than one period away keep reflecting, so short buffers
/// never index out of bounds. Used by the CWT.
pub(crate) fn reflect(n: isize, len: usize) -> usize {
    if len < 2 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = n.rem_euclid(period);
    if m >= len as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}

/// FWT filter-bank edge: negative indices reflect about sample 0, and any
/// index at or past the end reads sample `len − 2`.
pub(crate) fn fold(n: isize, len: usize) -> usize {
    if len < 2 {
        return 0;
    }
    let n = n.unsigned_abs();
    if n >= len { len - 2 } else { n }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_is_identity() {
        for i in 0..5 {
            assert_eq!(reflect(i, 5), i as usize);
            assert_eq!(fold(i, 5), i as usize);
        }
    }

    #[test]
    fn reflects_about_edges() {
        assert_eq!(reflect(-1, 5), 1);
        assert_eq!(reflect(-4, 5), 4);
        assert_eq!(reflect(5, 5), 3);
        assert_eq!(reflect(7, 5), 1);
    }

    #[test]
    fn fold_holds_the_right_edge() {
        assert_eq!(fold(-1, 5), 1);
        assert_eq!(fold(-4, 5), 4);
        assert_eq!(fold(5, 5), 3);
        assert_eq!(fold(6, 5), 3);
        assert_eq!(fold(9, 5), 3);
        assert_eq!(fold(-7, 5), 3);
    }

    #[test]
    fn far_indices_stay_in_bounds() {
        for n in -40..40 {
            assert!(reflect(n, 3) < 3);
            assert!(fold(n, 3) < 3);
        }
        assert_eq!(reflect(17, 1), 0);
        assert_eq!(fold(17, 1), 0);
        assert_eq!(fold(-3, 0), 0);
    }
}
