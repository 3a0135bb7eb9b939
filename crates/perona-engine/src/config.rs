//! Run configuration and validation.
//!
//! [`DiffusionConfig`] is an immutable parameter bundle. It is validated
//! once, when it is built; a different diffusivity (or any other swept
//! parameter) is expressed by deriving a new value, never by mutating a
//! configuration that a run may be reading.

use perona_core::{validate_lambda, ClipBounds, DiffusionError, Diffusivity};
use perona_propagators::PeronaMalik;

// ── StabilityPolicy ────────────────────────────────────────────────

/// What a run does when `dt` exceeds the step's stability bound
/// (`Propagator::max_dt`, 0.25 for the 4-neighbour explicit scheme).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StabilityPolicy {
    /// Accept the time step and log a warning. Clipping keeps the output
    /// inside the intensity range, but the result may oscillate.
    #[default]
    Permissive,
    /// Reject the run with `InvalidParameter { parameter: "dt" }` before
    /// the first iteration.
    Strict,
}

// ── DiffusionConfig ────────────────────────────────────────────────

/// Validated parameters for one diffusion run.
///
/// Defaults: `lambda_param = 10`, `sigma = 1`, `dt = 0.25`,
/// 50 iterations, PM1, clip range `[0, 255]`, permissive stability.
///
/// ```
/// use perona_core::Diffusivity;
/// use perona_engine::DiffusionConfig;
///
/// let base = DiffusionConfig::new(15.0, 1.0, 0.2, 30).unwrap();
/// let pm2 = base.with_diffusivity(Diffusivity::Pm2);
/// assert_eq!(base.diffusivity(), Diffusivity::Pm1);
/// assert_eq!(pm2.diffusivity(), Diffusivity::Pm2);
/// assert!(base.with_diffusivity_name("unknown").is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DiffusionConfig {
    lambda_param: f64,
    sigma: f64,
    dt: f64,
    num_iterations: usize,
    diffusivity: Diffusivity,
    clip_bounds: ClipBounds,
    stability: StabilityPolicy,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            lambda_param: 10.0,
            sigma: 1.0,
            dt: 0.25,
            num_iterations: 50,
            diffusivity: Diffusivity::Pm1,
            clip_bounds: ClipBounds::U8,
            stability: StabilityPolicy::Permissive,
        }
    }
}

impl DiffusionConfig {
    /// Validate the four numeric parameters; everything else takes its
    /// default (PM1, `[0, 255]`, permissive).
    pub fn new(
        lambda_param: f64,
        sigma: f64,
        dt: f64,
        num_iterations: usize,
    ) -> Result<Self, DiffusionError> {
        Self::builder()
            .lambda_param(lambda_param)
            .sigma(sigma)
            .dt(dt)
            .num_iterations(num_iterations)
            .build()
    }

    /// Start from the defaults.
    pub fn builder() -> DiffusionConfigBuilder {
        DiffusionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Edge-contrast threshold `λ`.
    pub fn lambda_param(&self) -> f64 {
        self.lambda_param
    }

    /// Gaussian pre-smoothing scale; 0 disables pre-smoothing.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Explicit-Euler time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of iterations a run executes.
    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Selected diffusivity function.
    pub fn diffusivity(&self) -> Diffusivity {
        self.diffusivity
    }

    /// Intensity range applied after every iteration.
    pub fn clip_bounds(&self) -> ClipBounds {
        self.clip_bounds
    }

    /// Handling of a `dt` above the stability bound.
    pub fn stability(&self) -> StabilityPolicy {
        self.stability
    }

    /// A copy of this configuration using `diffusivity`.
    pub fn with_diffusivity(&self, diffusivity: Diffusivity) -> Self {
        Self {
            diffusivity,
            ..self.clone()
        }
    }

    /// A copy of this configuration using the diffusivity named `name`
    /// (`"pm1"`, `"pm2"` or `"charbonnier"`).
    ///
    /// # Errors
    ///
    /// `InvalidParameter { parameter: "diffusivity" }` for any other name.
    pub fn with_diffusivity_name(&self, name: &str) -> Result<Self, DiffusionError> {
        Ok(self.with_diffusivity(name.parse()?))
    }

    /// A copy of this configuration with a different `λ`.
    pub fn with_lambda_param(&self, lambda_param: f64) -> Result<Self, DiffusionError> {
        Ok(Self {
            lambda_param: validate_lambda(lambda_param)?,
            ..self.clone()
        })
    }

    /// A copy of this configuration with a different pre-smoothing scale.
    pub fn with_sigma(&self, sigma: f64) -> Result<Self, DiffusionError> {
        Ok(Self {
            sigma: validate_sigma(sigma)?,
            ..self.clone()
        })
    }

    /// The Perona-Malik step these parameters describe.
    pub fn propagator(&self) -> Result<PeronaMalik, DiffusionError> {
        PeronaMalik::builder()
            .diffusivity(self.diffusivity)
            .lambda(self.lambda_param)
            .sigma(self.sigma)
            .build()
    }
}

fn validate_sigma(sigma: f64) -> Result<f64, DiffusionError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(DiffusionError::invalid(
            "sigma",
            format!("must be finite and >= 0, got {sigma}"),
        ));
    }
    Ok(sigma)
}

// ── DiffusionConfigBuilder ─────────────────────────────────────────

/// Builder for [`DiffusionConfig`]; all checks happen in
/// [`build()`](DiffusionConfigBuilder::build).
#[derive(Clone, Debug)]
pub struct DiffusionConfigBuilder {
    config: DiffusionConfig,
}

impl DiffusionConfigBuilder {
    /// Set `λ` (default 10). Must be finite and > 0.
    pub fn lambda_param(mut self, lambda_param: f64) -> Self {
        self.config.lambda_param = lambda_param;
        self
    }

    /// Set the pre-smoothing scale (default 1). Must be finite and >= 0.
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.config.sigma = sigma;
        self
    }

    /// Set the time step (default 0.25). Must be finite and > 0.
    pub fn dt(mut self, dt: f64) -> Self {
        self.config.dt = dt;
        self
    }

    /// Set the iteration count (default 50). Must be > 0.
    pub fn num_iterations(mut self, num_iterations: usize) -> Self {
        self.config.num_iterations = num_iterations;
        self
    }

    /// Set the diffusivity function (default PM1).
    pub fn diffusivity(mut self, diffusivity: Diffusivity) -> Self {
        self.config.diffusivity = diffusivity;
        self
    }

    /// Set the intensity range (default `[0, 255]`).
    pub fn clip_bounds(mut self, clip_bounds: ClipBounds) -> Self {
        self.config.clip_bounds = clip_bounds;
        self
    }

    /// Set the stability policy (default permissive).
    pub fn stability(mut self, stability: StabilityPolicy) -> Self {
        self.config.stability = stability;
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` naming `lambda_param`, `sigma`, `dt` or
    /// `num_iterations`, checked in that order.
    pub fn build(self) -> Result<DiffusionConfig, DiffusionError> {
        let config = self.config;
        validate_lambda(config.lambda_param)?;
        validate_sigma(config.sigma)?;
        if !config.dt.is_finite() || config.dt <= 0.0 {
            return Err(DiffusionError::invalid(
                "dt",
                format!("must be finite and > 0, got {}", config.dt),
            ));
        }
        if config.num_iterations == 0 {
            return Err(DiffusionError::invalid("num_iterations", "must be > 0"));
        }
        Ok(config)
    }
}
