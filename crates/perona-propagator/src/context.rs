//! Execution context passed to propagators during one diffusion iteration.
//!
//! [`StepContext`] provides split-borrow access to two buffers: the frozen
//! image from the end of the previous iteration and the buffer the current
//! iteration writes into. Both are channel-last `(rows, cols, channels)`;
//! a grayscale image is a single channel.

use ndarray::{ArrayView3, ArrayViewMut3};
use perona_core::{ClipBounds, PropagatorError};

/// Execution context passed to each propagator's `step()` method.
///
/// # Split-borrow semantics
///
/// - **`previous()`** is the fully materialised output of the previous
///   iteration. It never changes while the step runs, so every output pixel
///   may be computed independently (and in parallel) from it.
///
/// - **`next()`** is the write buffer. Its initial contents are unspecified;
///   a propagator MUST overwrite every cell.
pub struct StepContext<'a> {
    previous: ArrayView3<'a, f64>,
    next: ArrayViewMut3<'a, f64>,
    dt: f64,
    bounds: ClipBounds,
    iteration: usize,
}

impl<'a> StepContext<'a> {
    /// Construct a new step context.
    ///
    /// Typically called by the engine, not by propagators directly.
    pub fn new(
        previous: ArrayView3<'a, f64>,
        next: ArrayViewMut3<'a, f64>,
        dt: f64,
        bounds: ClipBounds,
        iteration: usize,
    ) -> Self {
        Self {
            previous,
            next,
            dt,
            bounds,
            iteration,
        }
    }

    /// Frozen image from the previous iteration.
    ///
    /// The returned view is not tied to the borrow of `self`, so it can be
    /// held while writing through [`next()`](Self::next).
    pub fn previous(&self) -> ArrayView3<'a, f64> {
        self.previous.clone()
    }

    /// Write buffer for this iteration.
    pub fn next(&mut self) -> ArrayViewMut3<'_, f64> {
        self.next.view_mut()
    }

    /// Explicit-Euler time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Intensity range every updated value is clipped into.
    pub fn bounds(&self) -> ClipBounds {
        self.bounds
    }

    /// One-based index of the iteration being computed.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Verify that the read and write buffers have the same shape.
    pub fn check_shapes(&self) -> Result<(), PropagatorError> {
        if self.previous.shape() != self.next.shape() {
            return Err(PropagatorError::ShapeMismatch {
                expected: self.previous.shape().to_vec(),
                actual: self.next.shape().to_vec(),
            });
        }
        Ok(())
    }
}
