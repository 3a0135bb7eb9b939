//! Intensity clip range applied after every diffusion update.

use ndarray::{Array, ArrayViewMut, Dimension};

use crate::error::DiffusionError;

/// Closed intensity interval `[low, high]`.
///
/// Clipping after each explicit update keeps the working image inside the
/// representable intensity range even when `dt` exceeds the stability
/// bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipBounds {
    low: f64,
    high: f64,
}

impl ClipBounds {
    /// The 8-bit intensity range `[0, 255]`.
    pub const U8: ClipBounds = ClipBounds {
        low: 0.0,
        high: 255.0,
    };

    /// Construct a clip range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either bound is non-finite or
    /// `low >= high`.
    pub fn new(low: f64, high: f64) -> Result<Self, DiffusionError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(DiffusionError::invalid(
                "clip_bounds",
                format!("bounds must be finite, got [{low}, {high}]"),
            ));
        }
        if low >= high {
            return Err(DiffusionError::invalid(
                "clip_bounds",
                format!("low ({low}) must be < high ({high})"),
            ));
        }
        Ok(Self { low, high })
    }

    /// Lower bound.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Clamp a single value into the range.
    #[inline]
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.low, self.high)
    }

    /// Whether `v` lies inside the closed range.
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.low && v <= self.high
    }

    /// Clamp every element of `values` in place.
    pub fn apply<D: Dimension>(&self, mut values: ArrayViewMut<'_, f64, D>) {
        values.mapv_inplace(|v| self.clamp(v));
    }

    /// Whether every element of `values` lies inside the range.
    pub fn contains_all<D: Dimension>(&self, values: &Array<f64, D>) -> bool {
        values.iter().all(|&v| self.contains(v))
    }
}

impl Default for ClipBounds {
    fn default() -> Self {
        Self::U8
    }
}
