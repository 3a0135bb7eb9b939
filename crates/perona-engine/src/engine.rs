//! Grayscale and multi-channel Perona-Malik engines.
//!
//! [`DiffusionEngine`] owns a validated [`DiffusionConfig`] and the step it
//! describes. Each run converts its input to `f64`, iterates the step over
//! fresh ping-pong buffers, and returns the real-valued result, its `u8`
//! quantisation and the per-iteration statistics. Runs share nothing, so
//! one engine can serve concurrent runs from several threads.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use perona_core::{quantize_u8, DiffusionError, Diffusivity};
use perona_propagators::PeronaMalik;

use crate::config::DiffusionConfig;
use crate::driver::{run_propagator, single_channel};
use crate::observer::{NoProgress, ProgressObserver};
use crate::stats::{ChannelIterationStats, History, IterationStats};

// ── Run results ────────────────────────────────────────────────────

/// Output of a grayscale run.
#[derive(Clone, Debug)]
pub struct GrayscaleRun {
    /// Filtered image, clipped and truncated to `u8`.
    pub image: Array2<u8>,
    /// Filtered image before quantisation.
    pub field: Array2<f64>,
    /// Statistics after every iteration.
    pub history: History<IterationStats>,
}

/// Output of a multi-channel run.
#[derive(Clone, Debug)]
pub struct MultiChannelRun {
    /// Filtered channel-last image, clipped and truncated to `u8`.
    pub image: Array3<u8>,
    /// Filtered image before quantisation.
    pub field: Array3<f64>,
    /// Per-channel statistics after every iteration.
    pub history: History<ChannelIterationStats>,
}

// ── DiffusionEngine ────────────────────────────────────────────────

/// Perona-Malik diffusion engine.
///
/// ```
/// use ndarray::Array2;
/// use perona_engine::{DiffusionConfig, DiffusionEngine};
///
/// let engine = DiffusionEngine::new(DiffusionConfig::new(10.0, 1.0, 0.25, 5).unwrap()).unwrap();
/// let image = Array2::<u8>::from_elem((16, 16), 128);
/// let run = engine.run(image.view()).unwrap();
/// assert_eq!(run.image, image);
/// assert_eq!(run.history.len(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct DiffusionEngine {
    config: DiffusionConfig,
    step: PeronaMalik,
}

impl DiffusionEngine {
    /// Create an engine for `config`.
    pub fn new(config: DiffusionConfig) -> Result<Self, DiffusionError> {
        let step = config.propagator()?;
        Ok(Self { config, step })
    }

    /// The configuration every run uses.
    pub fn config(&self) -> &DiffusionConfig {
        &self.config
    }

    /// The diffusion step every run iterates.
    pub fn propagator(&self) -> &PeronaMalik {
        &self.step
    }

    /// A new engine identical to this one except for the diffusivity.
    pub fn with_diffusivity(&self, diffusivity: Diffusivity) -> Result<Self, DiffusionError> {
        Self::new(self.config.with_diffusivity(diffusivity))
    }

    /// Filter a single-channel image.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an empty or non-finite image, or an unstable
    /// `dt` under the strict stability policy. No iteration runs.
    pub fn run<T>(&self, image: ArrayView2<'_, T>) -> Result<GrayscaleRun, DiffusionError>
    where
        T: Copy + Into<f64>,
    {
        self.run_with_observer(image, &mut NoProgress)
    }

    /// [`run`](Self::run), notifying `observer` after every iteration.
    pub fn run_with_observer<T>(
        &self,
        image: ArrayView2<'_, T>,
        observer: &mut dyn ProgressObserver<IterationStats>,
    ) -> Result<GrayscaleRun, DiffusionError>
    where
        T: Copy + Into<f64>,
    {
        let gray: Array2<f64> = image.mapv(|v| v.into());
        let (rows, cols) = gray.dim();
        log::info!(
            "grayscale diffusion: {rows}x{cols}, {} lambda={} sigma={} dt={} iterations={}",
            self.config.diffusivity(),
            self.config.lambda_param(),
            self.config.sigma(),
            self.config.dt(),
            self.config.num_iterations(),
        );

        let outcome = run_propagator(
            &self.step,
            &self.config,
            single_channel(gray),
            |iteration, _, img| IterationStats::measure(iteration, img.index_axis(Axis(2), 0)),
            observer,
        )?;

        if let Some(last) = outcome.history.last() {
            log::info!(
                "grayscale diffusion complete: mean={:.3} variance={:.3} gradient={:.3}",
                last.mean,
                last.variance,
                last.gradient_magnitude
            );
        }
        let field = outcome.field.index_axis_move(Axis(2), 0);
        Ok(GrayscaleRun {
            image: quantize_u8(field.view()),
            field,
            history: outcome.history,
        })
    }

    /// Filter a channel-last image with one diffusivity field shared by
    /// all channels.
    ///
    /// A single-channel input gives exactly the grayscale result.
    ///
    /// # Errors
    ///
    /// As for [`run`](Self::run).
    pub fn run_multichannel<T>(
        &self,
        image: ArrayView3<'_, T>,
    ) -> Result<MultiChannelRun, DiffusionError>
    where
        T: Copy + Into<f64>,
    {
        self.run_multichannel_with_observer(image, &mut NoProgress)
    }

    /// [`run_multichannel`](Self::run_multichannel), notifying `observer`
    /// after every iteration.
    pub fn run_multichannel_with_observer<T>(
        &self,
        image: ArrayView3<'_, T>,
        observer: &mut dyn ProgressObserver<ChannelIterationStats>,
    ) -> Result<MultiChannelRun, DiffusionError>
    where
        T: Copy + Into<f64>,
    {
        let initial: Array3<f64> = image.mapv(|v| v.into());
        let (rows, cols, channels) = initial.dim();
        log::info!(
            "multi-channel diffusion: {rows}x{cols}x{channels}, {} lambda={} sigma={} dt={} iterations={}",
            self.config.diffusivity(),
            self.config.lambda_param(),
            self.config.sigma(),
            self.config.dt(),
            self.config.num_iterations(),
        );

        let outcome = run_propagator(
            &self.step,
            &self.config,
            initial,
            |iteration, previous, img| {
                ChannelIterationStats::measure_step(iteration, &self.step, previous, img)
            },
            observer,
        )?;

        if let Some(last) = outcome.history.last() {
            log::info!(
                "multi-channel diffusion complete: means={:?} gradient={:.3}",
                last.means.as_slice(),
                last.total_gradient_magnitude
            );
        }
        Ok(MultiChannelRun {
            image: quantize_u8(outcome.field.view()),
            field: outcome.field,
            history: outcome.history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StabilityPolicy;

    fn engine(iterations: usize) -> DiffusionEngine {
        DiffusionEngine::new(DiffusionConfig::new(10.0, 1.0, 0.25, iterations).unwrap()).unwrap()
    }

    #[test]
    fn output_keeps_shape() {
        let image = Array2::from_shape_fn((9, 13), |(r, c)| ((r * 31 + c * 17) % 256) as u8);
        let run = engine(3).run(image.view()).unwrap();
        assert_eq!(run.image.dim(), (9, 13));
        assert_eq!(run.field.dim(), (9, 13));
        assert_eq!(run.history.len(), 3);
    }

    #[test]
    fn accepts_real_valued_input() {
        let image = Array2::from_elem((4, 4), 12.5f64);
        let run = engine(2).run(image.view()).unwrap();
        assert_eq!(run.field, image);
        assert!(run.image.iter().all(|&v| v == 12));
    }

    #[test]
    fn quantised_image_truncates_field() {
        let image = Array2::from_shape_fn((8, 8), |(r, c)| ((r * 8 + c) * 3) as u8);
        let run = engine(4).run(image.view()).unwrap();
        for (q, f) in run.image.iter().zip(run.field.iter()) {
            assert_eq!(*q, f.clamp(0.0, 255.0) as u8);
        }
    }

    #[test]
    fn empty_image_is_invalid() {
        let image = Array2::<u8>::zeros((0, 5));
        let err = engine(1).run(image.view()).unwrap_err();
        assert_eq!(err.parameter(), Some("image"));
    }

    #[test]
    fn strict_policy_rejects_unstable_dt() {
        let config = DiffusionConfig::builder()
            .dt(0.3)
            .stability(StabilityPolicy::Strict)
            .build()
            .unwrap();
        let image = Array2::<u8>::from_elem((4, 4), 9);
        let err = DiffusionEngine::new(config)
            .unwrap()
            .run(image.view())
            .unwrap_err();
        assert_eq!(err.parameter(), Some("dt"));
    }

    #[test]
    fn permissive_policy_accepts_unstable_dt() {
        let config = DiffusionConfig::builder()
            .dt(0.3)
            .num_iterations(3)
            .build()
            .unwrap();
        let image = Array2::from_shape_fn((6, 6), |(r, c)| if (r + c) % 2 == 0 { 0u8 } else { 255 });
        let run = DiffusionEngine::new(config).unwrap().run(image.view()).unwrap();
        assert!(run.field.iter().all(|&v| (0.0..=255.0).contains(&v)));
    }

    #[test]
    fn with_diffusivity_only_changes_the_variant() {
        let base = engine(2);
        let pm2 = base.with_diffusivity(Diffusivity::Pm2).unwrap();
        assert_eq!(pm2.config().diffusivity(), Diffusivity::Pm2);
        assert_eq!(pm2.propagator().diffusivity(), Diffusivity::Pm2);
        assert_eq!(pm2.config().lambda_param(), base.config().lambda_param());
        assert_eq!(base.config().diffusivity(), Diffusivity::Pm1);
    }

    #[test]
    fn multichannel_output_keeps_shape() {
        let image = Array3::from_shape_fn((6, 7, 3), |(r, c, k)| ((r * 40 + c * 5 + k * 60) % 256) as u8);
        let run = engine(2).run_multichannel(image.view()).unwrap();
        assert_eq!(run.image.dim(), (6, 7, 3));
        assert_eq!(run.history.len(), 2);
        assert_eq!(run.history[0].channels(), 3);
    }
}
