//! Conversion of real-valued working images to 8-bit output.

use ndarray::{Array, ArrayView, Dimension};

/// Quantise a real-valued image to `u8`.
///
/// Values are clamped to `[0, 255]` and truncated toward zero, matching an
/// unsigned integer cast of the clipped field. NaN maps to 0.
pub fn quantize_u8<D: Dimension>(field: ArrayView<'_, f64, D>) -> Array<u8, D> {
    field.mapv(|v| {
        if v.is_nan() {
            0
        } else {
            v.clamp(0.0, 255.0) as u8
        }
    })
}
