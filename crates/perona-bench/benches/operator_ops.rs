//! Criterion benchmarks for the per-iteration operators.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{Array3, Axis};
use perona_core::ClipBounds;
use perona_propagator::{Propagator, StepContext};
use perona_propagators::{gaussian_smooth, gradients, PeronaMalik};
use perona_test_utils::synthetic_grayscale;

const SIZES: [usize; 3] = [64, 256, 512];

fn image(size: usize) -> Array3<f64> {
    synthetic_grayscale(size, size, 7)
        .mapv(f64::from)
        .insert_axis(Axis(2))
}

fn bench_gradients(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradients");
    for size in SIZES {
        let img = image(size);
        let channel = img.index_axis(Axis(2), 0);
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| black_box(gradients(channel)));
        });
    }
    group.finish();
}

fn bench_gaussian(c: &mut Criterion) {
    let mut group = c.benchmark_group("gaussian_sigma1");
    for size in SIZES {
        let img = image(size);
        let channel = img.index_axis(Axis(2), 0);
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| black_box(gaussian_smooth(channel, 1.0)));
        });
    }
    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let prop = PeronaMalik::builder().build().unwrap();
    let mut group = c.benchmark_group("perona_malik_step");
    for size in SIZES {
        let img = image(size);
        let mut next = Array3::<f64>::zeros(img.raw_dim());
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| {
                let mut ctx =
                    StepContext::new(img.view(), next.view_mut(), 0.25, ClipBounds::U8, 1);
                prop.step(&mut ctx).unwrap();
            });
        });
        black_box(&next);
    }
    group.finish();
}

criterion_group!(benches, bench_gradients, bench_gaussian, bench_step);
criterion_main!(benches);
