//! Core types for the Perona nonlinear diffusion workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces every other crate agrees on: the [`Diffusivity`] enumeration,
//! the [`ClipBounds`] intensity range, 8-bit quantisation, and the error
//! types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod diffusivity;
pub mod error;
pub mod quantize;

pub use bounds::ClipBounds;
pub use diffusivity::{validate_lambda, Diffusivity};
pub use error::{DiffusionError, PropagatorError};
pub use quantize::quantize_u8;
