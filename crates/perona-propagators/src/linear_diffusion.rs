//! Linear (isotropic) diffusion step.
//!
//! The heat equation `∂I/∂t = ΔI` advanced by explicit Euler with the
//! 5-point Laplacian. Smoothing is the same everywhere, so edges blur at
//! the same rate as noise; this is the baseline the edge-preserving step is
//! compared against.

use ndarray::{Array2, ArrayView2, Axis, Zip};
use perona_core::PropagatorError;
use perona_propagator::{Propagator, StepContext};

use crate::grid_helpers::{fill_pixels, replicate};

/// 5-point Laplacian with edge replication:
/// `N + S + E + W - 4·C`.
pub fn laplacian(field: ArrayView2<'_, f64>) -> Array2<f64> {
    let (rows, cols) = field.dim();
    let mut out = Array2::zeros((rows, cols));
    if rows == 0 || cols == 0 {
        return out;
    }
    fill_pixels(out.view_mut(), |r, c| {
        let (ri, ci) = (r as isize, c as isize);
        let north = field[[replicate(ri - 1, rows), c]];
        let south = field[[replicate(ri + 1, rows), c]];
        let west = field[[r, replicate(ci - 1, cols)]];
        let east = field[[r, replicate(ci + 1, cols)]];
        north + south + west + east - 4.0 * field[[r, c]]
    });
    out
}

/// Explicit linear diffusion: `I' = clip(I + dt · ΔI)` per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearDiffusion;

impl LinearDiffusion {
    /// Create a linear diffusion step.
    pub fn new() -> Self {
        Self
    }
}

impl Propagator for LinearDiffusion {
    fn name(&self) -> &str {
        "LinearDiffusion"
    }

    fn max_dt(&self) -> Option<f64> {
        Some(crate::perona_malik::MAX_STABLE_DT)
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        ctx.check_shapes()?;
        let previous = ctx.previous();
        let dt = ctx.dt();
        let bounds = ctx.bounds();

        let mut next = ctx.next();
        for (src, dst) in previous
            .axis_iter(Axis(2))
            .zip(next.axis_iter_mut(Axis(2)))
        {
            let lap = laplacian(src);
            Zip::from(dst)
                .and(src)
                .and(&lap)
                .for_each(|o, &i, &l| *o = bounds.clamp(i + dt * l));
        }
        Ok(())
    }
}
