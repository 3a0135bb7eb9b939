//! Linear diffusion baseline.
//!
//! Runs the plain heat equation with the same time step, iteration count
//! and clip range as a Perona-Malik configuration, for judging how much
//! edge contrast the nonlinear model preserves.

use ndarray::{Array2, ArrayView2, Axis};
use perona_core::{quantize_u8, DiffusionError};
use perona_propagators::LinearDiffusion;

use crate::config::DiffusionConfig;
use crate::driver::{run_propagator, single_channel};
use crate::engine::GrayscaleRun;
use crate::observer::NoProgress;
use crate::stats::IterationStats;

/// Filter `image` with linear diffusion using `config`'s `dt`, iteration
/// count, clip range and stability policy. `lambda_param`, `sigma` and the
/// diffusivity are ignored.
pub fn run_linear<T>(
    config: &DiffusionConfig,
    image: ArrayView2<'_, T>,
) -> Result<GrayscaleRun, DiffusionError>
where
    T: Copy + Into<f64>,
{
    let gray: Array2<f64> = image.mapv(|v| v.into());
    log::info!(
        "linear diffusion: {:?}, dt={} iterations={}",
        gray.dim(),
        config.dt(),
        config.num_iterations()
    );
    let outcome = run_propagator(
        &LinearDiffusion::new(),
        config,
        single_channel(gray),
        |iteration, _, img| IterationStats::measure(iteration, img.index_axis(Axis(2), 0)),
        &mut NoProgress,
    )?;
    let field = outcome.field.index_axis_move(Axis(2), 0);
    Ok(GrayscaleRun {
        image: quantize_u8(field.view()),
        field,
        history: outcome.history,
    })
}
