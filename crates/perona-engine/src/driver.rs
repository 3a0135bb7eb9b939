//! The iteration loop shared by every engine.
//!
//! [`run_propagator`] drives any [`Propagator`] for the configured number
//! of iterations over a pair of ping-pong buffers. Each iteration reads
//! the published buffer (the complete output of the previous iteration),
//! writes the staging buffer, then swaps the two roles:
//!
//! ```text
//! iteration i:   published ──step──▶ staging
//!                swap
//! iteration i+1: published ──step──▶ staging
//! ```
//!
//! No iteration ever reads a partially written image.

use std::mem;

use ndarray::{Array3, ArrayView3, Axis};
use perona_core::DiffusionError;
use perona_propagator::{Propagator, StepContext};

use crate::config::{DiffusionConfig, StabilityPolicy};
use crate::observer::ProgressObserver;
use crate::stats::History;

/// Two equally shaped buffers alternating between published and staging.
struct PingPong {
    published: Array3<f64>,
    staging: Array3<f64>,
}

impl PingPong {
    fn new(initial: Array3<f64>) -> Self {
        let staging = Array3::zeros(initial.raw_dim());
        Self {
            published: initial,
            staging,
        }
    }

    fn publish(&mut self) {
        mem::swap(&mut self.published, &mut self.staging);
    }

    fn into_published(self) -> Array3<f64> {
        self.published
    }
}

/// Final image and statistics of a completed run.
#[derive(Clone, Debug)]
pub struct DriveOutcome<S> {
    /// Real-valued image after the last iteration.
    pub field: Array3<f64>,
    /// One entry per iteration, in order.
    pub history: History<S>,
}

/// Reject images with an empty axis or non-finite samples.
pub(crate) fn validate_image(image: ArrayView3<'_, f64>) -> Result<(), DiffusionError> {
    let (rows, cols, channels) = image.dim();
    if rows == 0 || cols == 0 || channels == 0 {
        return Err(DiffusionError::invalid(
            "image",
            format!("shape ({rows}, {cols}, {channels}) has an empty axis"),
        ));
    }
    if image.iter().any(|v| !v.is_finite()) {
        return Err(DiffusionError::invalid("image", "contains non-finite samples"));
    }
    Ok(())
}

/// Check `config.dt()` against the propagator's stability bound.
pub(crate) fn check_stability(
    propagator: &dyn Propagator,
    config: &DiffusionConfig,
) -> Result<(), DiffusionError> {
    let Some(max_dt) = propagator.max_dt() else {
        return Ok(());
    };
    let dt = config.dt();
    if dt <= max_dt {
        return Ok(());
    }
    match config.stability() {
        StabilityPolicy::Strict => Err(DiffusionError::invalid(
            "dt",
            format!(
                "{dt} exceeds the stability bound {max_dt} of '{}'",
                propagator.name()
            ),
        )),
        StabilityPolicy::Permissive => {
            log::warn!(
                "dt = {dt} exceeds the stability bound {max_dt} of '{}'; \
                 the result may oscillate before clipping",
                propagator.name()
            );
            Ok(())
        }
    }
}

/// Run `propagator` for `config.num_iterations()` iterations from `initial`.
///
/// After each iteration `measure(iteration, previous, image)` is recorded
/// in the history and passed to `observer`; `previous` is the image the
/// iteration read and `image` the one it wrote. `dt`, the clip bounds and the
/// stability policy come from `config`; its diffusion parameters are not
/// consulted, so any step can be driven with the same schedule.
///
/// # Errors
///
/// - `InvalidParameter { parameter: "image" }` for an empty axis or a
///   non-finite sample.
/// - `InvalidParameter { parameter: "dt" }` for an unstable `dt` under
///   [`StabilityPolicy::Strict`].
/// - `PropagatorFailed` if a step reports an error; the partial result is
///   discarded.
pub fn run_propagator<S, M>(
    propagator: &dyn Propagator,
    config: &DiffusionConfig,
    initial: Array3<f64>,
    measure: M,
    observer: &mut dyn ProgressObserver<S>,
) -> Result<DriveOutcome<S>, DiffusionError>
where
    M: Fn(usize, ArrayView3<'_, f64>, ArrayView3<'_, f64>) -> S,
{
    validate_image(initial.view())?;
    check_stability(propagator, config)?;

    let total = config.num_iterations();
    let bounds = config.clip_bounds();
    let mut buffers = PingPong::new(initial);
    let mut history = History::with_capacity(total);

    for iteration in 1..=total {
        {
            let PingPong { published, staging } = &mut buffers;
            let mut ctx = StepContext::new(
                published.view(),
                staging.view_mut(),
                config.dt(),
                bounds,
                iteration,
            );
            propagator
                .step(&mut ctx)
                .map_err(|reason| DiffusionError::PropagatorFailed {
                    name: propagator.name().to_string(),
                    reason,
                })?;
        }
        buffers.publish();

        let stats = measure(
            iteration,
            buffers.staging.view(),
            buffers.published.view(),
        );
        observer.on_iteration(iteration, total, &stats);
        history.push(stats);
        log::debug!(
            "{}: iteration {iteration}/{total} complete",
            propagator.name()
        );
    }

    Ok(DriveOutcome {
        field: buffers.into_published(),
        history,
    })
}

/// Widen a single-channel image to the channel-last layout.
pub(crate) fn single_channel(field: ndarray::Array2<f64>) -> Array3<f64> {
    field.insert_axis(Axis(2))
}
