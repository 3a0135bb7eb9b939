//! Error types for the Perona diffusion workspace.
//!
//! Configuration and input validation failures surface as
//! [`DiffusionError::InvalidParameter`]; failures inside a single
//! diffusion step are reported by propagators as [`PropagatorError`] and
//! wrapped by the engine.

use std::error::Error;
use std::fmt;

/// Errors returned by configuration, validation, and engine runs.
///
/// `InvalidParameter` is always detected before the first iteration
/// executes. Either way a returned error means no output was produced.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffusionError {
    /// A configuration value or input shape is outside its valid domain.
    InvalidParameter {
        /// Name of the offending parameter (e.g. `"lambda_param"`).
        parameter: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },
    /// A propagator failed while executing a step.
    PropagatorFailed {
        /// Name of the failing propagator.
        name: String,
        /// The underlying propagator error.
        reason: PropagatorError,
    },
}

impl DiffusionError {
    /// Shorthand for [`DiffusionError::InvalidParameter`].
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    /// The parameter name if this is an `InvalidParameter` error.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { parameter, .. } => Some(parameter),
            Self::PropagatorFailed { .. } => None,
        }
    }

    /// Returns `true` for [`DiffusionError::InvalidParameter`].
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

impl fmt::Display for DiffusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { parameter, reason } => {
                write!(f, "invalid parameter '{parameter}': {reason}")
            }
            Self::PropagatorFailed { name, reason } => {
                write!(f, "propagator '{name}' failed: {reason}")
            }
        }
    }
}

impl Error for DiffusionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PropagatorFailed { reason, .. } => Some(reason),
            Self::InvalidParameter { .. } => None,
        }
    }
}

/// Errors from individual propagator execution.
///
/// Returned by `Propagator::step()` and wrapped in
/// [`DiffusionError::PropagatorFailed`] by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropagatorError {
    /// The propagator's step function failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The read and write buffers handed to the step disagree in shape.
    ShapeMismatch {
        /// Shape of the frozen input buffer.
        expected: Vec<usize>,
        /// Shape of the output buffer.
        actual: Vec<usize>,
    },
}

impl fmt::Display for PropagatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected:?}, got {actual:?}")
            }
        }
    }
}

impl Error for PropagatorError {}
