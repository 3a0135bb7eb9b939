//! Reusable propagator test fixtures.
//!
//! Three trivial steps for driver and observer testing:
//!
//! - [`HoldPropagator`] copies the previous image unchanged.
//! - [`ConstPropagator`] writes a constant value (clipped), ignoring input.
//! - [`FailingPropagator`] fails deterministically after N calls.

use perona_core::PropagatorError;
use perona_propagator::{Propagator, StepContext};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Copies the previous image into the write buffer.
///
/// Useful for testing buffer swapping: after any number of iterations the
/// output must equal the input.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoldPropagator;

impl Propagator for HoldPropagator {
    fn name(&self) -> &str {
        "Hold"
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        ctx.check_shapes()?;
        let previous = ctx.previous();
        ctx.next().assign(&previous);
        Ok(())
    }
}

/// Writes a constant value to every cell, clipped into the step's bounds.
pub struct ConstPropagator {
    pub value: f64,
}

impl ConstPropagator {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Propagator for ConstPropagator {
    fn name(&self) -> &str {
        "Const"
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        let bounds = ctx.bounds();
        let mut next = ctx.next();
        next.fill(self.value);
        bounds.apply(next);
        Ok(())
    }
}

/// Fails deterministically after a configurable number of successful calls.
///
/// Successful calls behave like [`HoldPropagator`]. Uses `AtomicUsize` for
/// the call counter so it satisfies `Sync`.
pub struct FailingPropagator {
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingPropagator {
    /// Create a propagator that succeeds `succeed_count` times then fails.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `step()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Propagator for FailingPropagator {
    fn name(&self) -> &str {
        "Failing"
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(PropagatorError::ExecutionFailed {
                reason: format!(
                    "deliberate failure at iteration {} after {} successful calls",
                    ctx.iteration(),
                    self.succeed_count
                ),
            });
        }
        let previous = ctx.previous();
        ctx.next().assign(&previous);
        Ok(())
    }
}
