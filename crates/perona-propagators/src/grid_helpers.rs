//! Shared grid helpers for the stencil operators.
//!
//! Provides border index resolution (edge replication for derivatives,
//! half-sample reflection for the smoothing kernel) and a per-pixel fill
//! that switches to rayon for large images.

use ndarray::{ArrayViewMut2, Zip};

/// Pixel count from which per-pixel fills run in parallel.
pub(crate) const PARALLEL_MIN_PIXELS: usize = 64 * 64;

/// Resolve an axis index by replicating the nearest edge sample.
///
/// `len` must be non-zero.
#[inline]
pub(crate) fn replicate(val: isize, len: usize) -> usize {
    val.clamp(0, len as isize - 1) as usize
}

/// Resolve an axis index by half-sample symmetric reflection
/// (`d c b a | a b c d | d c b a`), valid for any overshoot.
///
/// `len` must be non-zero.
#[inline]
pub(crate) fn reflect(val: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let m = val.rem_euclid(period);
    if m < len {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Fill every cell of `out` with `f(row, col)`.
///
/// Every cell is a pure function of inputs the caller has already
/// materialised, so the parallel and sequential paths produce identical
/// values.
pub(crate) fn fill_pixels<F>(out: ArrayViewMut2<'_, f64>, f: F)
where
    F: Fn(usize, usize) -> f64 + Send + Sync,
{
    if out.len() >= PARALLEL_MIN_PIXELS {
        Zip::indexed(out).par_for_each(|(r, c), v| *v = f(r, c));
    } else {
        Zip::indexed(out).for_each(|(r, c), v| *v = f(r, c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn replicate_in_bounds() {
        assert_eq!(replicate(2, 5), 2);
        assert_eq!(replicate(0, 5), 0);
    }

    #[test]
    fn replicate_out_of_bounds() {
        assert_eq!(replicate(-1, 5), 0);
        assert_eq!(replicate(5, 5), 4);
        assert_eq!(replicate(-3, 1), 0);
        assert_eq!(replicate(3, 1), 0);
    }

    #[test]
    fn reflect_half_sample() {
        // len 4: indices -4..8 map to 3 2 1 0 | 0 1 2 3 | 3 2 1 0
        let got: Vec<usize> = (-4..8).map(|i| reflect(i, 4)).collect();
        assert_eq!(got, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
    }

    #[test]
    fn reflect_large_overshoot_and_unit_length() {
        assert_eq!(reflect(9, 4), 1);
        assert_eq!(reflect(-9, 4), 0);
        for i in -5..5 {
            assert_eq!(reflect(i, 1), 0);
        }
    }

    #[test]
    fn fill_pixels_sequential_and_parallel_agree() {
        let f = |r: usize, c: usize| (r * 1000 + c) as f64;
        for (rows, cols) in [(3, 5), (80, 70)] {
            let mut out = Array2::<f64>::zeros((rows, cols));
            fill_pixels(out.view_mut(), f);
            for ((r, c), &v) in out.indexed_iter() {
                assert_eq!(v, f(r, c));
            }
        }
    }
}
