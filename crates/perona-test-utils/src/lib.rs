//! Test utilities for Perona development.
//!
//! Provides deterministic synthetic images ([`images`]) and small
//! [`Propagator`](perona_propagator::Propagator) implementations for
//! exercising the engine's driver ([`fixtures`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod images;

pub use fixtures::{ConstPropagator, FailingPropagator, HoldPropagator};
pub use images::{
    constant, gaussian_noise, replicate_channels, synthetic_color, synthetic_grayscale,
    vertical_step,
};
