//! Central-difference gradient and divergence operators.
//!
//! All operators replicate edge samples outward by one pixel, so the output
//! has the shape of the input and no derivative reaches across a missing
//! neighbour:
//!
//! ```text
//! dx[i, j] = (P[i, j+1] - P[i, j-1]) / 2
//! dy[i, j] = (P[i+1, j] - P[i-1, j]) / 2
//! ```
//!
//! Axis 0 is `y` (rows), axis 1 is `x` (columns).

use ndarray::{Array2, ArrayView2, Zip};

use crate::grid_helpers::{fill_pixels, replicate};

/// Derivative along `x` (columns).
pub fn derivative_x(field: ArrayView2<'_, f64>) -> Array2<f64> {
    let (rows, cols) = field.dim();
    let mut out = Array2::zeros((rows, cols));
    if cols == 0 {
        return out;
    }
    fill_pixels(out.view_mut(), |r, c| {
        let east = field[[r, replicate(c as isize + 1, cols)]];
        let west = field[[r, replicate(c as isize - 1, cols)]];
        (east - west) / 2.0
    });
    out
}

/// Derivative along `y` (rows).
pub fn derivative_y(field: ArrayView2<'_, f64>) -> Array2<f64> {
    let (rows, cols) = field.dim();
    let mut out = Array2::zeros((rows, cols));
    if rows == 0 {
        return out;
    }
    fill_pixels(out.view_mut(), |r, c| {
        let south = field[[replicate(r as isize + 1, rows), c]];
        let north = field[[replicate(r as isize - 1, rows), c]];
        (south - north) / 2.0
    });
    out
}

/// Both partial derivatives `(dx, dy)`.
pub fn gradients(field: ArrayView2<'_, f64>) -> (Array2<f64>, Array2<f64>) {
    (derivative_x(field), derivative_y(field))
}

/// Pointwise Euclidean norm `sqrt(gx² + gy²)`.
pub fn gradient_magnitude(gx: ArrayView2<'_, f64>, gy: ArrayView2<'_, f64>) -> Array2<f64> {
    Zip::from(gx)
        .and(gy)
        .map_collect(|&x, &y| (x * x + y * y).sqrt())
}

/// Divergence of the flux field `(fx, fy)`: `d/dx fx + d/dy fy`.
pub fn divergence(fx: ArrayView2<'_, f64>, fy: ArrayView2<'_, f64>) -> Array2<f64> {
    let mut div = derivative_x(fx);
    div += &derivative_y(fy);
    div
}

/// Sum of gradient magnitudes over the whole field, a scalar edge-energy
/// measure used by the iteration statistics.
pub fn total_gradient_magnitude(field: ArrayView2<'_, f64>) -> f64 {
    let (gx, gy) = gradients(field);
    Zip::from(&gx)
        .and(&gy)
        .fold(0.0, |acc, &x, &y| acc + (x * x + y * y).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    #[test]
    fn linear_ramp_in_x() {
        // col 0 = 0, col 1 = 10, col 2 = 20
        let f = Array2::from_shape_fn((3, 3), |(_, c)| c as f64 * 10.0);
        let (gx, gy) = gradients(f.view());
        // Interior: (20 - 0) / 2
        assert_eq!(gx[[1, 1]], 10.0);
        // Borders replicate: (10 - 0) / 2 and (20 - 10) / 2
        assert_eq!(gx[[1, 0]], 5.0);
        assert_eq!(gx[[1, 2]], 5.0);
        assert!(gy.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn linear_ramp_in_y() {
        let f = Array2::from_shape_fn((4, 2), |(r, _)| r as f64 * 2.0);
        let (gx, gy) = gradients(f.view());
        assert!(gx.iter().all(|&v| v == 0.0));
        assert_eq!(gy.column(0).to_vec(), vec![1.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn single_pixel_has_zero_gradient() {
        let f = array![[42.0]];
        let (gx, gy) = gradients(f.view());
        assert_eq!(gx, array![[0.0]]);
        assert_eq!(gy, array![[0.0]]);
    }

    #[test]
    fn degenerate_row_and_column() {
        let row = array![[1.0, 5.0, 2.0]];
        let (_, gy) = gradients(row.view());
        assert!(gy.iter().all(|&v| v == 0.0));

        let col = array![[1.0], [5.0], [2.0]];
        let (gx, _) = gradients(col.view());
        assert!(gx.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_field_yields_empty_output() {
        let f = Array2::<f64>::zeros((0, 4));
        let (gx, gy) = gradients(f.view());
        assert_eq!(gx.dim(), (0, 4));
        assert_eq!(gy.dim(), (0, 4));
    }

    #[test]
    fn magnitude_is_euclidean() {
        let gx = array![[3.0, 0.0]];
        let gy = array![[4.0, -2.0]];
        let m = gradient_magnitude(gx.view(), gy.view());
        assert_eq!(m, array![[5.0, 2.0]]);
    }

    #[test]
    fn divergence_of_zero_flux_is_zero() {
        let zero = Array2::<f64>::zeros((7, 5));
        let div = divergence(zero.view(), zero.view());
        assert!(div.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn divergence_sums_axis_derivatives() {
        let fx = Array2::from_shape_fn((3, 3), |(_, c)| c as f64);
        let fy = Array2::from_shape_fn((3, 3), |(r, _)| 3.0 * r as f64);
        let div = divergence(fx.view(), fy.view());
        // Interior: d/dx fx = 1, d/dy fy = 3
        assert_eq!(div[[1, 1]], 4.0);
    }

    #[test]
    fn total_magnitude_of_step() {
        // Single vertical step of height 10 between columns 1 and 2.
        let f = Array2::from_shape_fn((2, 4), |(_, c)| if c < 2 { 0.0 } else { 10.0 });
        // Columns 1 and 2 each see (10 - 0) / 2 = 5 per row.
        assert_eq!(total_gradient_magnitude(f.view()), 20.0);
    }

    #[test]
    fn large_field_matches_small_path() {
        // Crosses the parallel threshold; interior values must still be exact.
        let f = Array2::from_shape_fn((80, 80), |(r, c)| (r * 3 + c * 7) as f64);
        let (gx, gy) = gradients(f.view());
        assert_eq!(gx[[40, 40]], 7.0);
        assert_eq!(gy[[40, 40]], 3.0);
        assert_eq!(gx[[40, 0]], 3.5);
    }

    proptest! {
        #[test]
        fn constant_field_has_zero_gradient(
            rows in 1usize..12,
            cols in 1usize..12,
            value in -1000.0f64..1000.0,
        ) {
            let f = Array2::from_elem((rows, cols), value);
            let (gx, gy) = gradients(f.view());
            prop_assert!(gx.iter().all(|&v| v == 0.0));
            prop_assert!(gy.iter().all(|&v| v == 0.0));
            prop_assert_eq!(total_gradient_magnitude(f.view()), 0.0);
        }
    }
}
