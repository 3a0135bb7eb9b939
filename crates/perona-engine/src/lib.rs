//! Perona-Malik diffusion engines.
//!
//! Provides [`DiffusionEngine`], which runs the explicit Perona-Malik
//! scheme over grayscale or channel-last images for a fixed number of
//! iterations and records per-iteration statistics. Around it sit the
//! validated [`DiffusionConfig`], progress [observers](observer), the
//! linear diffusion baseline, and parallel parameter sweeps.
//!
//! # Example
//!
//! ```
//! use ndarray::Array2;
//! use perona_engine::{DiffusionConfig, DiffusionEngine};
//!
//! let config = DiffusionConfig::builder().num_iterations(10).build().unwrap();
//! let engine = DiffusionEngine::new(config).unwrap();
//! let image = Array2::from_shape_fn((32, 32), |(r, c)| ((r * 7 + c * 13) % 256) as u8);
//! let run = engine.run(image.view()).unwrap();
//! assert_eq!(run.history.len(), 10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod baseline;
pub mod config;
pub mod driver;
pub mod engine;
pub mod observer;
pub mod stats;
pub mod sweep;

pub use baseline::run_linear;
pub use config::{DiffusionConfig, DiffusionConfigBuilder, StabilityPolicy};
pub use driver::{run_propagator, DriveOutcome};
pub use engine::{DiffusionEngine, GrayscaleRun, MultiChannelRun};
pub use observer::{
    ChannelObserver, EveryNth, LogProgress, NoProgress, ProgressEvent, ProgressObserver,
};
pub use stats::{ChannelIterationStats, ChannelSeries, History, IterationStats};
pub use sweep::{
    compare_diffusivities, sweep_lambda, sweep_sigma, DEFAULT_LAMBDAS, DEFAULT_SIGMAS,
};
