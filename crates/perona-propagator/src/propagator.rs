//! The [`Propagator`] trait.
//!
//! A propagator advances an image by one explicit time step. The engine
//! owns the iteration loop and the buffers; propagators are stateless
//! operators that read the frozen previous image and fill the next one.

use crate::context::StepContext;
use perona_core::PropagatorError;

/// A stateless single-iteration update of a channel-last image.
///
/// # Contract
///
/// - `step()` MUST be deterministic: same inputs produce identical outputs.
/// - `step()` MUST write every cell of `ctx.next()`, and every written
///   value MUST lie inside `ctx.bounds()`.
/// - `&self`: propagators hold configuration only; no state carries
///   from one iteration to the next.
///
/// # Object safety
///
/// This trait is object-safe; drivers accept `&dyn Propagator`.
///
/// # Examples
///
/// A propagator that leaves the image unchanged:
///
/// ```
/// use perona_core::PropagatorError;
/// use perona_propagator::{Propagator, StepContext};
///
/// struct Hold;
///
/// impl Propagator for Hold {
///     fn name(&self) -> &str { "hold" }
///
///     fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
///         ctx.check_shapes()?;
///         let previous = ctx.previous();
///         ctx.next().assign(&previous);
///         Ok(())
///     }
/// }
///
/// assert_eq!(Hold.name(), "hold");
/// assert!(Hold.max_dt().is_none());
/// ```
pub trait Propagator: Send + Sync + 'static {
    /// Human-readable name for error reporting and logging.
    fn name(&self) -> &str;

    /// Largest time step for which the explicit scheme is stable.
    ///
    /// The engine compares the configured `dt` against this bound and,
    /// depending on its stability policy, warns or rejects the run.
    /// Return `None` to impose no constraint.
    fn max_dt(&self) -> Option<f64> {
        None
    }

    /// Execute one iteration.
    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError>;
}
