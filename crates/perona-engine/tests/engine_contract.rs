//! Engine contract tests: statistics ordering, configuration errors,
//! grayscale/multi-channel agreement, and progress observers.

use std::thread;

use ndarray::{Array3, Axis};
use perona_core::Diffusivity;
use perona_engine::{
    ChannelIterationStats, ChannelObserver, DiffusionConfig, DiffusionEngine, EveryNth,
    IterationStats, LogProgress, ProgressEvent,
};
use perona_test_utils::{replicate_channels, synthetic_color, synthetic_grayscale, vertical_step};

fn engine(lambda: f64, sigma: f64, iterations: usize) -> DiffusionEngine {
    DiffusionEngine::new(DiffusionConfig::new(lambda, sigma, 0.25, iterations).unwrap()).unwrap()
}

// ── Statistics log ─────────────────────────────────────────────────

#[test]
fn history_has_one_entry_per_iteration_in_order() {
    let image = synthetic_grayscale(32, 32, 3);
    for n in [1, 7, 25] {
        let run = engine(10.0, 1.0, n).run(image.view()).unwrap();
        assert_eq!(run.history.len(), n);
        let order: Vec<usize> = run.history.iter().map(|s| s.iteration).collect();
        assert_eq!(order, (1..=n).collect::<Vec<_>>());
        assert_eq!(run.history.means().len(), n);
    }
}

#[test]
fn last_entry_describes_the_returned_field() {
    let image = synthetic_grayscale(32, 32, 5);
    let run = engine(10.0, 1.0, 6).run(image.view()).unwrap();
    let measured = IterationStats::measure(6, run.field.view());
    assert_eq!(run.history.last(), Some(&measured));
}

// ── Configuration errors ───────────────────────────────────────────

#[test]
fn negative_lambda_is_rejected() {
    let err = DiffusionConfig::new(-1.0, 1.0, 0.25, 10).unwrap_err();
    assert!(err.is_invalid_parameter());
    assert_eq!(err.parameter(), Some("lambda_param"));
}

#[test]
fn unknown_diffusivity_is_rejected() {
    let err = DiffusionConfig::default()
        .with_diffusivity_name("unknown")
        .unwrap_err();
    assert!(err.is_invalid_parameter());
    assert_eq!(err.parameter(), Some("diffusivity"));
    assert!("PM1".parse::<Diffusivity>().is_err());
}

#[test]
fn non_positive_dt_and_iterations_are_rejected() {
    assert_eq!(
        DiffusionConfig::new(10.0, 1.0, 0.0, 10).unwrap_err().parameter(),
        Some("dt")
    );
    assert_eq!(
        DiffusionConfig::new(10.0, 1.0, 0.25, 0).unwrap_err().parameter(),
        Some("num_iterations")
    );
}

#[test]
fn empty_images_are_rejected_for_both_engines() {
    let e = engine(10.0, 1.0, 3);
    let gray = ndarray::Array2::<u8>::zeros((0, 0));
    assert_eq!(e.run(gray.view()).unwrap_err().parameter(), Some("image"));
    let color = Array3::<u8>::zeros((4, 4, 0));
    assert_eq!(
        e.run_multichannel(color.view()).unwrap_err().parameter(),
        Some("image")
    );
}

// ── Grayscale / multi-channel agreement ────────────────────────────

#[test]
fn single_channel_multichannel_run_equals_grayscale_run() {
    let image = synthetic_grayscale(24, 20, 11);
    for sigma in [0.0, 1.0] {
        let e = engine(10.0, sigma, 8);
        let gray = e.run(image.view()).unwrap();
        let stacked = image.clone().insert_axis(Axis(2));
        let multi = e.run_multichannel(stacked.view()).unwrap();

        assert_eq!(multi.field.index_axis(Axis(2), 0), gray.field);
        for (g, m) in gray.history.iter().zip(multi.history.iter()) {
            assert_eq!(m.channel(0).as_ref(), Some(g));
            assert_eq!(m.total_gradient_magnitude, g.gradient_magnitude);
        }
    }
}

#[test]
fn channel_gradient_statistic_matches_grayscale_computation() {
    let gray = vertical_step(16, 16, 50.0, 200.0);
    let stacked = replicate_channels(&gray, 3);
    let run = engine(10.0, 0.0, 5).run_multichannel(stacked.view()).unwrap();

    for stats in &run.history {
        let reference = stats.gradient_magnitudes[0];
        assert!(stats.gradient_magnitudes.iter().all(|&g| g == reference));
    }
    let last = run.history.last().unwrap();
    for k in 0..3 {
        let slice = run.field.index_axis(Axis(2), k);
        let single = IterationStats::measure(last.iteration, slice);
        assert_eq!(last.channel(k), Some(single));
    }
}

#[test]
fn color_channels_share_edges() {
    let image = synthetic_color(48, 48, 2);
    let run = engine(15.0, 1.0, 10).run_multichannel(image.view()).unwrap();
    assert_eq!(run.image.dim(), (48, 48, 3));
    let first: &ChannelIterationStats = &run.history[0];
    let last = run.history.last().unwrap();
    assert_eq!(first.channels(), 3);
    assert!(last.total_gradient_magnitude < first.total_gradient_magnitude);
    assert_eq!(run.history.channel_means(2).len(), 10);
    assert!(run.history.channel_means(3).is_empty());
    assert_eq!(run.history.total_gradient_magnitudes().len(), 10);
}

#[test]
fn edge_strength_tracks_the_pre_step_smoothed_magnitude() {
    let image = synthetic_color(32, 32, 2);
    let e = engine(15.0, 1.0, 2);
    let run = e.run_multichannel(image.view()).unwrap();

    let input: Array3<f64> = image.mapv(f64::from);
    let first = e.propagator().combined_magnitude(input.view()).sum();
    let strengths = run.history.edge_strengths();
    assert_eq!(strengths.len(), 2);
    assert_eq!(strengths[0], first);

    // Iteration 2 reads the image iteration 1 wrote.
    let one = engine(15.0, 1.0, 1).run_multichannel(image.view()).unwrap();
    let second = e.propagator().combined_magnitude(one.field.view()).sum();
    assert_eq!(strengths[1], second);

    // Pre-smoothing removes most of the noise the raw gradient sees.
    assert!(strengths[1] < run.history[0].total_gradient_magnitude);
}

// ── Observers ──────────────────────────────────────────────────────

#[test]
fn observer_sees_the_recorded_statistics() {
    let image = synthetic_grayscale(16, 16, 9);
    let mut seen: Vec<IterationStats> = Vec::new();
    let mut obs = |_i: usize, _n: usize, s: &IterationStats| seen.push(s.clone());
    let run = engine(10.0, 1.0, 5)
        .run_with_observer(image.view(), &mut obs)
        .unwrap();
    assert_eq!(seen, run.history.into_vec());
}

#[test]
fn observer_does_not_change_the_result() {
    let image = synthetic_grayscale(16, 16, 9);
    let e = engine(10.0, 1.0, 5);
    let quiet = e.run(image.view()).unwrap();
    let logged = e.run_with_observer(image.view(), &mut LogProgress).unwrap();
    assert_eq!(quiet.field, logged.field);
}

#[test]
fn progress_every_tenth_iteration_over_a_channel() {
    let image = synthetic_grayscale(32, 32, 1);
    let (tx, rx) = crossbeam_channel::unbounded::<ProgressEvent<IterationStats>>();

    let consumer = thread::spawn(move || rx.iter().map(|e| (e.iteration, e.total)).collect::<Vec<_>>());

    let mut observer = EveryNth::new(10, ChannelObserver::new(tx));
    engine(10.0, 1.0, 45)
        .run_with_observer(image.view(), &mut observer)
        .unwrap();
    drop(observer);

    let events = consumer.join().unwrap();
    assert_eq!(events, vec![(10, 45), (20, 45), (30, 45), (40, 45), (45, 45)]);
}
