//! Propagator trait and step context for Perona diffusion steps.
//!
//! The `Propagator` trait defines the `&self` step function with a
//! split-borrow `StepContext` over the frozen previous image and the
//! write buffer for the current iteration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod propagator;

pub use context::StepContext;
pub use propagator::Propagator;
