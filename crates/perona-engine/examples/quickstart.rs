//! Perona Quickstart: edge-preserving smoothing from scratch.
//!
//! Demonstrates:
//!   1. Generating a noisy synthetic test image
//!   2. Building a DiffusionConfig and DiffusionEngine
//!   3. Comparing linear diffusion with the three diffusivity variants
//!   4. Filtering a colour image with a shared diffusivity field
//!   5. Sweeping the contrast threshold and the pre-smoothing scale
//!
//! Run with:
//!   RUST_LOG=info cargo run --example quickstart

use perona_core::Diffusivity;
use perona_engine::{
    compare_diffusivities, run_linear, sweep_lambda, sweep_sigma, ChannelIterationStats,
    DiffusionConfig, DiffusionEngine, EveryNth, GrayscaleRun, IterationStats, DEFAULT_LAMBDAS,
    DEFAULT_SIGMAS,
};
use perona_test_utils::{synthetic_color, synthetic_grayscale};

// ─── Image parameters ───────────────────────────────────────────

const SIZE: usize = 256;
const SEED: u64 = 42;

// Rows crossing the bright horizontal band and columns crossing the dark
// vertical band of the synthetic image.
const BAND_EDGE_ROW: usize = 50;
const BAND_EDGE_COL: usize = 100;

fn summary(label: &str, run: &GrayscaleRun) {
    let Some(last) = run.history.last() else {
        return;
    };
    let edge = run.field[[BAND_EDGE_ROW, 10]] - run.field[[BAND_EDGE_ROW - 1, 10]];
    println!(
        "  {label:<14} mean={:>7.2} var={:>8.1} gradient={:>10.0} band-edge step={:>6.1}",
        last.mean, last.variance, last.gradient_magnitude, edge,
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Perona Quickstart ===\n");

    // 1. Noisy test image with a bright band and a dark band.
    let image = synthetic_grayscale(SIZE, SIZE, SEED);
    println!(
        "Image: {SIZE}x{SIZE} grayscale, seed {SEED}, dark band starts at column {BAND_EDGE_COL}"
    );

    // 2. Configuration: lambda 10, sigma 1, dt 0.25, 50 iterations, PM1.
    let config = DiffusionConfig::default();
    println!(
        "Config: lambda={} sigma={} dt={} iterations={} diffusivity={}\n",
        config.lambda_param(),
        config.sigma(),
        config.dt(),
        config.num_iterations(),
        config.diffusivity().label(),
    );

    // 3a. Single run with progress every 10th iteration.
    println!("Running {} ...", config.diffusivity().label());
    let engine = DiffusionEngine::new(config.clone())?;
    let mut progress = EveryNth::new(10, |i: usize, n: usize, s: &IterationStats| {
        println!(
            "  iteration {i:>3}/{n}: mean={:.2} variance={:.1} gradient={:.0}",
            s.mean, s.variance, s.gradient_magnitude
        );
    });
    let pm1 = engine.run_with_observer(image.view(), &mut progress)?;

    // 3b. Baseline and all variants side by side.
    println!("\nComparison after {} iterations:", config.num_iterations());
    let linear = run_linear(&config, image.view())?;
    summary("linear", &linear);
    for (diffusivity, run) in compare_diffusivities(&config, image.view())? {
        summary(diffusivity.label(), &run);
    }

    let charbonnier = engine.with_diffusivity(Diffusivity::Charbonnier)?;
    println!(
        "\nDerived engine uses {}, base engine still uses {}",
        charbonnier.config().diffusivity(),
        engine.config().diffusivity(),
    );
    println!(
        "PM1 output range: {}..={}",
        pm1.image.iter().min().copied().unwrap_or(0),
        pm1.image.iter().max().copied().unwrap_or(0),
    );

    // 4. Colour image: lambda 15, 30 iterations.
    let color = synthetic_color(SIZE, SIZE, SEED);
    let color_config = DiffusionConfig::new(15.0, 1.0, 0.25, 30)?;
    println!("\nRunning colour diffusion (lambda=15, 30 iterations)...");
    let mut color_progress = EveryNth::new(10, |i: usize, n: usize, s: &ChannelIterationStats| {
        println!(
            "  iteration {i:>3}/{n}: means={:.1?} gradient={:.0} edge strength={:.0}",
            s.means.as_slice(),
            s.total_gradient_magnitude,
            s.edge_strength.unwrap_or(0.0),
        );
    });
    let color_run =
        DiffusionEngine::new(color_config)?.run_multichannel_with_observer(color.view(), &mut color_progress)?;
    let gradients = color_run.history.total_gradient_magnitudes();
    println!(
        "  combined gradient {:.0} -> {:.0}",
        gradients.first().copied().unwrap_or(0.0),
        gradients.last().copied().unwrap_or(0.0),
    );
    for k in 0..color_run.image.dim().2 {
        let variances = color_run.history.channel_variances(k);
        println!(
            "  channel {k}: variance {:.1} -> {:.1}",
            variances.first().copied().unwrap_or(0.0),
            variances.last().copied().unwrap_or(0.0),
        );
    }

    // 5. Parameter sweeps.
    println!("\nLambda sweep:");
    for (label, run) in sweep_lambda(&config, image.view(), &DEFAULT_LAMBDAS)? {
        summary(&label, &run);
    }
    println!("\nSigma sweep:");
    for (label, run) in sweep_sigma(&config, image.view(), &DEFAULT_SIGMAS)? {
        summary(&label, &run);
    }

    println!("\nDone.");
    Ok(())
}
