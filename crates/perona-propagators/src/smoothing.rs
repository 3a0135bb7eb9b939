//! Separable Gaussian pre-smoothing.
//!
//! Used only to estimate the diffusivity field; the flux itself always acts
//! on the unsmoothed image. The kernel is truncated at four standard
//! deviations and the border is extended by half-sample reflection.

use ndarray::{Array2, ArrayView2};

use crate::grid_helpers::{fill_pixels, reflect};

/// Kernel half-width in standard deviations.
pub const TRUNCATE: f64 = 4.0;

/// Normalised 1-D Gaussian weights of length `2 * radius + 1`, where
/// `radius = floor(TRUNCATE * sigma + 0.5)`.
///
/// Returns `[1.0]` for a non-positive `sigma`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if !(sigma > 0.0) {
        return vec![1.0];
    }
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let inv = -0.5 / (sigma * sigma);
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (inv * (x * x) as f64).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Smooth `field` with an isotropic Gaussian of standard deviation `sigma`.
///
/// `sigma == 0` returns an unmodified copy.
pub fn gaussian_smooth(field: ArrayView2<'_, f64>, sigma: f64) -> Array2<f64> {
    let (rows, cols) = field.dim();
    if !(sigma > 0.0) || rows == 0 || cols == 0 {
        return field.to_owned();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;

    // Rows first (along y), then columns (along x).
    let mut vertical = Array2::zeros((rows, cols));
    fill_pixels(vertical.view_mut(), |r, c| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * field[[reflect(r as isize + k as isize - radius, rows), c]])
            .sum()
    });

    let mut out = Array2::zeros((rows, cols));
    let vertical = vertical.view();
    fill_pixels(out.view_mut(), |r, c| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * vertical[[r, reflect(c as isize + k as isize - radius, cols)]])
            .sum()
    });
    out
}
