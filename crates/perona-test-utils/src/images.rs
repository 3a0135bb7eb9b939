//! Deterministic synthetic test images.
//!
//! The noisy generators reproduce a fixed layout scaled to the requested
//! size (band positions are defined on a 256×256 reference canvas) and
//! draw all randomness from a seeded ChaCha8 RNG, so identical seeds give
//! identical images.

use ndarray::{Array2, Array3, Axis, Slice};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Every pixel set to `value`.
pub fn constant(rows: usize, cols: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((rows, cols), value)
}

/// Vertical step edge: columns `< cols / 2` hold `left`, the rest `right`.
pub fn vertical_step(rows: usize, cols: usize, left: f64, right: f64) -> Array2<f64> {
    let split = cols / 2;
    Array2::from_shape_fn((rows, cols), |(_, c)| if c < split { left } else { right })
}

/// Copy a single-channel image into `channels` identical channels
/// (channel-last).
pub fn replicate_channels(gray: &Array2<f64>, channels: usize) -> Array3<f64> {
    let (rows, cols) = gray.dim();
    let mut out = Array3::zeros((rows, cols, channels));
    for mut ch in out.axis_iter_mut(Axis(2)) {
        ch.assign(gray);
    }
    out
}

/// Additive Gaussian noise with standard deviation `std_dev`.
///
/// Box-Muller transform; keeps the fixtures free of a distributions crate.
pub fn gaussian_noise(rng: &mut ChaCha8Rng, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Scale a coordinate on the 256-pixel reference canvas to `len`.
fn scaled(reference: usize, len: usize) -> usize {
    (reference * len / 256).min(len)
}

/// Reference range `start..end` scaled onto an axis of length `len`.
fn band(start: usize, end: usize, len: usize) -> Slice {
    Slice::from(scaled(start, len)..scaled(end, len))
}

fn to_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Noisy grayscale test image.
///
/// Uniform random background, a bright horizontal band (200) over
/// reference rows 50..80, a dark vertical band (50) over reference
/// columns 100..130, then Gaussian noise with σ = 25, clipped to `u8`.
pub fn synthetic_grayscale(rows: usize, cols: usize, seed: u64) -> Array2<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut img: Array2<f64> =
        Array2::from_shape_simple_fn((rows, cols), || rng.random_range(0..256u32) as f64);

    img.slice_axis_mut(Axis(0), band(50, 80, rows)).fill(200.0);
    img.slice_axis_mut(Axis(1), band(100, 130, cols)).fill(50.0);

    img.mapv(|v| to_u8(v + gaussian_noise(&mut rng, 25.0)))
}

/// Noisy three-channel test image (channel-last).
///
/// Uniform random background; channel 0 carries a horizontal band over
/// reference rows 50..80, channel 1 a vertical band over reference columns
/// 100..130, channel 2 a square over reference rows and columns 150..180,
/// all at 200; then Gaussian noise with σ = 20, clipped to `u8`.
pub fn synthetic_color(rows: usize, cols: usize, seed: u64) -> Array3<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut img: Array3<f64> =
        Array3::from_shape_simple_fn((rows, cols, 3), || rng.random_range(0..256u32) as f64);

    img.index_axis_mut(Axis(2), 0)
        .slice_axis_mut(Axis(0), band(50, 80, rows))
        .fill(200.0);
    img.index_axis_mut(Axis(2), 1)
        .slice_axis_mut(Axis(1), band(100, 130, cols))
        .fill(200.0);
    img.index_axis_mut(Axis(2), 2)
        .slice_axis_mut(Axis(0), band(150, 180, rows))
        .slice_axis_mut(Axis(1), band(150, 180, cols))
        .fill(200.0);

    img.mapv(|v| to_u8(v + gaussian_noise(&mut rng, 20.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_has_two_levels() {
        let img = vertical_step(4, 6, 50.0, 200.0);
        assert_eq!(img[[0, 2]], 50.0);
        assert_eq!(img[[3, 3]], 200.0);
    }

    #[test]
    fn replicated_channels_match_source() {
        let gray = vertical_step(3, 4, 1.0, 2.0);
        let rgb = replicate_channels(&gray, 3);
        assert_eq!(rgb.dim(), (3, 4, 3));
        for ch in rgb.axis_iter(Axis(2)) {
            assert_eq!(ch, gray);
        }
    }

    #[test]
    fn same_seed_same_image() {
        assert_eq!(synthetic_grayscale(32, 32, 7), synthetic_grayscale(32, 32, 7));
        assert_ne!(synthetic_grayscale(32, 32, 7), synthetic_grayscale(32, 32, 8));
        assert_eq!(synthetic_color(16, 16, 3), synthetic_color(16, 16, 3));
    }

    #[test]
    fn dark_band_is_darker_than_bright_band() {
        let img = synthetic_grayscale(256, 256, 1);
        let bright = img
            .slice_axis(Axis(0), Slice::from(50..80))
            .slice_axis(Axis(1), Slice::from(0..100))
            .mapv(f64::from)
            .mean()
            .unwrap();
        let dark = img
            .slice_axis(Axis(0), Slice::from(100..256))
            .slice_axis(Axis(1), Slice::from(100..130))
            .mapv(f64::from)
            .mean()
            .unwrap();
        assert!(bright > 170.0, "bright={bright}");
        assert!(dark < 80.0, "dark={dark}");
    }

    #[test]
    fn color_bands_land_on_their_channels() {
        let img = synthetic_color(256, 256, 4);
        let mean = |ch: usize, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>| {
            img.index_axis(Axis(2), ch)
                .slice_axis(Axis(0), Slice::from(rows))
                .slice_axis(Axis(1), Slice::from(cols))
                .mapv(f64::from)
                .mean()
                .unwrap()
        };
        assert!(mean(0, 50..80, 0..256) > 180.0);
        assert!(mean(1, 0..256, 100..130) > 180.0);
        assert!(mean(2, 150..180, 150..180) > 180.0);
        // Channel 2 keeps its random background outside the square.
        assert!(mean(2, 0..40, 0..40) < 160.0);
    }

    #[test]
    fn color_image_shape() {
        let img = synthetic_color(40, 50, 9);
        assert_eq!(img.dim(), (40, 50, 3));
    }
}
