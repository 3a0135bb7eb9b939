//! Per-iteration statistics and the ordered history of a run.
//!
//! Every statistic is measured on the image as it stands after the
//! iteration's update: unsmoothed, clipped, real-valued. The one exception
//! is [`ChannelIterationStats::edge_strength`], which records what the
//! iteration's shared diffusivity was computed from.

use std::ops::Index;

use ndarray::{ArrayView2, ArrayView3, Axis};
use perona_propagators::{total_gradient_magnitude, PeronaMalik};
use smallvec::SmallVec;

/// Per-channel series; inline for up to four channels.
pub type ChannelSeries = SmallVec<[f64; 4]>;

/// Population mean and variance of `values`. `(0, 0)` when empty.
fn mean_variance(values: ArrayView2<'_, f64>) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.sum() / n as f64;
    let variance = values.fold(0.0, |acc, &v| acc + (v - mean) * (v - mean)) / n as f64;
    (mean, variance)
}

// ── IterationStats ─────────────────────────────────────────────────

/// Statistics of a single-channel image after one iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationStats {
    /// One-based iteration index.
    pub iteration: usize,
    /// Mean intensity.
    pub mean: f64,
    /// Population variance of the intensity.
    pub variance: f64,
    /// Sum over all pixels of the gradient magnitude.
    pub gradient_magnitude: f64,
}

impl IterationStats {
    /// Measure `image` as the state after `iteration`.
    pub fn measure(iteration: usize, image: ArrayView2<'_, f64>) -> Self {
        let (mean, variance) = mean_variance(image);
        Self {
            iteration,
            mean,
            variance,
            gradient_magnitude: total_gradient_magnitude(image),
        }
    }
}

// ── ChannelIterationStats ──────────────────────────────────────────

/// Statistics of a channel-last image after one iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelIterationStats {
    /// One-based iteration index.
    pub iteration: usize,
    /// Mean intensity of each channel.
    pub means: ChannelSeries,
    /// Population variance of each channel.
    pub variances: ChannelSeries,
    /// Summed gradient magnitude of each channel.
    pub gradient_magnitudes: ChannelSeries,
    /// Sum of `gradient_magnitudes` over all channels.
    pub total_gradient_magnitude: f64,
    /// Sum over all pixels of the pre-smoothed, channel-summed gradient
    /// magnitude of the image this iteration read. `None` unless measured
    /// with [`measure_step`](Self::measure_step).
    pub edge_strength: Option<f64>,
}

impl ChannelIterationStats {
    /// Measure every channel of `image` as the state after `iteration`.
    pub fn measure(iteration: usize, image: ArrayView3<'_, f64>) -> Self {
        let channels = image.len_of(Axis(2));
        let mut means = ChannelSeries::with_capacity(channels);
        let mut variances = ChannelSeries::with_capacity(channels);
        let mut gradient_magnitudes = ChannelSeries::with_capacity(channels);
        for channel in image.axis_iter(Axis(2)) {
            let (mean, variance) = mean_variance(channel);
            means.push(mean);
            variances.push(variance);
            gradient_magnitudes.push(total_gradient_magnitude(channel));
        }
        let total_gradient_magnitude = gradient_magnitudes.iter().sum();
        Self {
            iteration,
            means,
            variances,
            gradient_magnitudes,
            total_gradient_magnitude,
            edge_strength: None,
        }
    }

    /// [`measure`](Self::measure) `image`, and record the edge strength
    /// `step` saw in `previous` when it computed the shared diffusivity.
    pub fn measure_step(
        iteration: usize,
        step: &PeronaMalik,
        previous: ArrayView3<'_, f64>,
        image: ArrayView3<'_, f64>,
    ) -> Self {
        Self {
            edge_strength: Some(step.combined_magnitude(previous).sum()),
            ..Self::measure(iteration, image)
        }
    }

    /// Number of channels measured.
    pub fn channels(&self) -> usize {
        self.means.len()
    }

    /// The single-channel view of channel `k`, or `None` if out of range.
    pub fn channel(&self, k: usize) -> Option<IterationStats> {
        Some(IterationStats {
            iteration: self.iteration,
            mean: *self.means.get(k)?,
            variance: *self.variances.get(k)?,
            gradient_magnitude: *self.gradient_magnitudes.get(k)?,
        })
    }
}

// ── History ────────────────────────────────────────────────────────

/// Ordered statistics of a run, one entry per completed iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct History<S> {
    entries: Vec<S>,
}

impl<S> History<S> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, stats: S) {
        self.entries.push(stats);
    }

    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no iteration has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in iteration order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.entries.iter()
    }

    /// Statistics of the final iteration.
    pub fn last(&self) -> Option<&S> {
        self.entries.last()
    }

    /// Entries as a slice.
    pub fn as_slice(&self) -> &[S] {
        &self.entries
    }

    /// Consume the history, returning the entries.
    pub fn into_vec(self) -> Vec<S> {
        self.entries
    }
}

impl<S> Index<usize> for History<S> {
    type Output = S;

    fn index(&self, index: usize) -> &S {
        &self.entries[index]
    }
}

impl<'a, S> IntoIterator for &'a History<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl History<IterationStats> {
    /// Mean intensity per iteration.
    pub fn means(&self) -> Vec<f64> {
        self.entries.iter().map(|s| s.mean).collect()
    }

    /// Variance per iteration.
    pub fn variances(&self) -> Vec<f64> {
        self.entries.iter().map(|s| s.variance).collect()
    }

    /// Total gradient magnitude per iteration.
    pub fn gradient_magnitudes(&self) -> Vec<f64> {
        self.entries.iter().map(|s| s.gradient_magnitude).collect()
    }
}

impl History<ChannelIterationStats> {
    /// Mean of channel `k` per iteration (empty if `k` is out of range).
    pub fn channel_means(&self, k: usize) -> Vec<f64> {
        self.entries
            .iter()
            .filter_map(|s| s.means.get(k).copied())
            .collect()
    }

    /// Variance of channel `k` per iteration (empty if `k` is out of range).
    pub fn channel_variances(&self, k: usize) -> Vec<f64> {
        self.entries
            .iter()
            .filter_map(|s| s.variances.get(k).copied())
            .collect()
    }

    /// Combined gradient magnitude per iteration.
    pub fn total_gradient_magnitudes(&self) -> Vec<f64> {
        self.entries
            .iter()
            .map(|s| s.total_gradient_magnitude)
            .collect()
    }

    /// Edge strength per iteration, skipping entries measured without a step.
    pub fn edge_strengths(&self) -> Vec<f64> {
        self.entries.iter().filter_map(|s| s.edge_strength).collect()
    }
}
