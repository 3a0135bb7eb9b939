//! Side-by-side runs over diffusivities and parameter values.
//!
//! Every run is independent, so the runs of one sweep execute in parallel
//! on the rayon pool. Results keep the order of the requested values.

use indexmap::IndexMap;
use ndarray::{Array2, ArrayView2};
use perona_core::{DiffusionError, Diffusivity};
use rayon::prelude::*;

use crate::config::DiffusionConfig;
use crate::engine::{DiffusionEngine, GrayscaleRun};

/// Contrast thresholds compared by [`sweep_lambda`] in the demo.
pub const DEFAULT_LAMBDAS: [f64; 3] = [5.0, 10.0, 20.0];

/// Pre-smoothing scales compared by [`sweep_sigma`] in the demo.
pub const DEFAULT_SIGMAS: [f64; 3] = [0.5, 1.0, 2.0];

/// Run `config` once per diffusivity variant, keyed PM1, PM2, Charbonnier.
pub fn compare_diffusivities<T>(
    config: &DiffusionConfig,
    image: ArrayView2<'_, T>,
) -> Result<IndexMap<Diffusivity, GrayscaleRun>, DiffusionError>
where
    T: Copy + Into<f64>,
{
    let configs: Vec<(Diffusivity, DiffusionConfig)> = Diffusivity::ALL
        .iter()
        .map(|&d| (d, config.with_diffusivity(d)))
        .collect();
    run_all(configs, image)
}

/// Run `config` once per `λ`, keyed `"lambda=<value>"`.
///
/// Every value is validated before any run starts. A repeated value keeps
/// its first position and the later result.
pub fn sweep_lambda<T>(
    config: &DiffusionConfig,
    image: ArrayView2<'_, T>,
    lambdas: &[f64],
) -> Result<IndexMap<String, GrayscaleRun>, DiffusionError>
where
    T: Copy + Into<f64>,
{
    let configs = lambdas
        .iter()
        .map(|&l| Ok((format!("lambda={l}"), config.with_lambda_param(l)?)))
        .collect::<Result<Vec<_>, DiffusionError>>()?;
    run_all(configs, image)
}

/// Run `config` once per pre-smoothing scale, keyed `"sigma=<value>"`.
///
/// Validation and ordering as for [`sweep_lambda`].
pub fn sweep_sigma<T>(
    config: &DiffusionConfig,
    image: ArrayView2<'_, T>,
    sigmas: &[f64],
) -> Result<IndexMap<String, GrayscaleRun>, DiffusionError>
where
    T: Copy + Into<f64>,
{
    let configs = sigmas
        .iter()
        .map(|&s| Ok((format!("sigma={s}"), config.with_sigma(s)?)))
        .collect::<Result<Vec<_>, DiffusionError>>()?;
    run_all(configs, image)
}

fn run_all<K, T>(
    configs: Vec<(K, DiffusionConfig)>,
    image: ArrayView2<'_, T>,
) -> Result<IndexMap<K, GrayscaleRun>, DiffusionError>
where
    K: std::hash::Hash + Eq + Send,
    T: Copy + Into<f64>,
{
    let gray: Array2<f64> = image.mapv(|v| v.into());
    let engines = configs
        .into_iter()
        .map(|(key, config)| Ok((key, DiffusionEngine::new(config)?)))
        .collect::<Result<Vec<_>, DiffusionError>>()?;

    let runs = engines
        .into_par_iter()
        .map(|(key, engine)| Ok((key, engine.run(gray.view())?)))
        .collect::<Result<Vec<_>, DiffusionError>>()?;
    Ok(runs.into_iter().collect())
}
