//! Perona: Perona-Malik anisotropic diffusion for edge-preserving image
//! smoothing.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Perona sub-crates. For most users, adding `perona` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::Array2;
//! use perona::prelude::*;
//!
//! // 32×32 step edge: left half 50, right half 200.
//! let image = Array2::from_shape_fn((32, 32), |(_, c)| if c < 16 { 50u8 } else { 200 });
//!
//! let config = DiffusionConfig::new(10.0, 1.0, 0.25, 50).unwrap();
//! let run = DiffusionEngine::new(config.clone()).unwrap().run(image.view()).unwrap();
//! let linear = run_linear(&config, image.view()).unwrap();
//!
//! let contrast = |img: &Array2<u8>| i32::from(img[[16, 16]]) - i32::from(img[[16, 15]]);
//! assert!(contrast(&run.image) > contrast(&linear.image));
//! assert_eq!(run.history.len(), 50);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `perona-core` | Diffusivity functions, clip bounds, quantisation, errors |
//! | [`propagator`] | `perona-propagator` | Propagator trait and step context |
//! | [`propagators`] | `perona-propagators` | Gradient operators, smoothing, Perona-Malik and linear steps |
//! | [`engine`] | `perona-engine` | Configuration, engines, statistics, observers, sweeps |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`perona-core`).
///
/// Contains [`types::Diffusivity`], [`types::ClipBounds`],
/// [`types::quantize_u8`], and the error types.
pub use perona_core as types;

/// Propagator trait and step context (`perona-propagator`).
///
/// The [`propagator::Propagator`] trait is the extension point for custom
/// diffusion steps, driven with [`engine::run_propagator`].
pub use perona_propagator as propagator;

/// Operators and diffusion steps (`perona-propagators`).
///
/// Includes [`propagators::PeronaMalik`], [`propagators::LinearDiffusion`],
/// and the gradient and smoothing operators they are built from.
pub use perona_propagators as propagators;

/// Diffusion engines (`perona-engine`).
///
/// [`engine::DiffusionEngine`] for grayscale and multi-channel runs,
/// [`engine::run_linear`] for the linear baseline, and the parameter sweeps.
pub use perona_engine as engine;

/// Common imports for typical Perona usage.
///
/// ```rust
/// use perona::prelude::*;
/// ```
///
/// This imports the configuration, the engine and its results, statistics,
/// observers, and the core error and diffusivity types.
pub mod prelude {
    // Core types
    pub use perona_core::{ClipBounds, DiffusionError, Diffusivity, PropagatorError};

    // Propagator
    pub use perona_propagator::{Propagator, StepContext};

    // Steps
    pub use perona_propagators::{LinearDiffusion, PeronaMalik};

    // Engine
    pub use perona_engine::{
        compare_diffusivities, run_linear, run_propagator, sweep_lambda, sweep_sigma,
        ChannelIterationStats, DiffusionConfig, DiffusionEngine, EveryNth, GrayscaleRun, History,
        IterationStats, MultiChannelRun, NoProgress, ProgressObserver, StabilityPolicy,
    };
}
