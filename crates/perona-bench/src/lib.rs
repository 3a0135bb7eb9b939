//! Benchmark profiles for the Perona diffusion workspace.
//!
//! Provides fixed configurations and images so benchmarks and profiling
//! runs measure the same workload:
//!
//! - [`reference_profile`]: 128x128 grayscale, default parameters
//! - [`stress_profile`]: 512x512 grayscale, default parameters
//! - [`color_profile`]: 128x128 three-channel, `lambda = 15`, 30 iterations

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ndarray::{Array2, Array3};
use perona_core::DiffusionError;
use perona_engine::DiffusionConfig;
use perona_test_utils::{synthetic_color, synthetic_grayscale};

/// Seed used by every profile image.
pub const PROFILE_SEED: u64 = 42;

/// A configuration together with the image it is benchmarked on.
pub struct Profile<I> {
    /// Diffusion parameters.
    pub config: DiffusionConfig,
    /// Input image.
    pub image: I,
}

/// 128x128 noisy grayscale image, default parameters (PM1, 50 iterations).
pub fn reference_profile() -> Profile<Array2<u8>> {
    Profile {
        config: DiffusionConfig::default(),
        image: synthetic_grayscale(128, 128, PROFILE_SEED),
    }
}

/// 512x512 noisy grayscale image, default parameters.
pub fn stress_profile() -> Profile<Array2<u8>> {
    Profile {
        config: DiffusionConfig::default(),
        image: synthetic_grayscale(512, 512, PROFILE_SEED),
    }
}

/// 128x128 noisy colour image, `lambda = 15`, 30 iterations.
pub fn color_profile() -> Result<Profile<Array3<u8>>, DiffusionError> {
    Ok(Profile {
        config: DiffusionConfig::new(15.0, 1.0, 0.25, 30)?,
        image: synthetic_color(128, 128, PROFILE_SEED),
    })
}
