//! Diffusion operators and steps for the Perona workspace.
//!
//! Leaves first:
//!
//! - [`gradient`]: central-difference derivatives, gradient magnitude, and
//!   divergence with edge replication.
//! - [`smoothing`]: separable Gaussian pre-smoothing.
//! - [`PeronaMalik`]: one explicit Perona-Malik iteration over a
//!   channel-last image with a shared diffusivity field.
//! - [`LinearDiffusion`]: one explicit heat-equation iteration, the
//!   non-edge-aware baseline.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod gradient;
mod grid_helpers;
pub mod linear_diffusion;
pub mod perona_malik;
pub mod smoothing;

pub use gradient::{
    derivative_x, derivative_y, divergence, gradient_magnitude, gradients,
    total_gradient_magnitude,
};
pub use linear_diffusion::{laplacian, LinearDiffusion};
pub use perona_malik::{PeronaMalik, PeronaMalikBuilder, MAX_STABLE_DT};
pub use smoothing::{gaussian_kernel, gaussian_smooth};
