//! Iteration-completion observers for progress reporting.
//!
//! Observers receive a read-only view of each iteration's statistics. They
//! cannot influence the run; a run with and without an observer produces
//! identical output.

use crossbeam_channel::Sender;
use std::fmt::Debug;

/// Called once after every completed iteration, in order.
pub trait ProgressObserver<S> {
    /// `iteration` is one-based; `total` is the configured iteration count.
    fn on_iteration(&mut self, iteration: usize, total: usize, stats: &S);
}

impl<S, F> ProgressObserver<S> for F
where
    F: FnMut(usize, usize, &S),
{
    fn on_iteration(&mut self, iteration: usize, total: usize, stats: &S) {
        self(iteration, total, stats)
    }
}

/// Ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl<S> ProgressObserver<S> for NoProgress {
    fn on_iteration(&mut self, _iteration: usize, _total: usize, _stats: &S) {}
}

/// Forwards every `n`-th iteration, plus the final one, to `inner`.
#[derive(Clone, Debug)]
pub struct EveryNth<O> {
    every: usize,
    inner: O,
}

impl<O> EveryNth<O> {
    /// Forward iterations `n, 2n, ...` and the last. `n = 0` is treated as 1.
    pub fn new(every: usize, inner: O) -> Self {
        Self {
            every: every.max(1),
            inner,
        }
    }
}

impl<S, O: ProgressObserver<S>> ProgressObserver<S> for EveryNth<O> {
    fn on_iteration(&mut self, iteration: usize, total: usize, stats: &S) {
        if iteration % self.every == 0 || iteration == total {
            self.inner.on_iteration(iteration, total, stats);
        }
    }
}

/// Logs each notification at `info` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl<S: Debug> ProgressObserver<S> for LogProgress {
    fn on_iteration(&mut self, iteration: usize, total: usize, stats: &S) {
        log::info!("iteration {iteration}/{total}: {stats:?}");
    }
}

/// One progress notification, as sent by [`ChannelObserver`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent<S> {
    /// One-based iteration index.
    pub iteration: usize,
    /// Configured iteration count.
    pub total: usize,
    /// Statistics after the iteration.
    pub stats: S,
}

/// Sends a [`ProgressEvent`] per iteration over a channel so another
/// thread can render progress. A disconnected receiver is ignored.
#[derive(Clone, Debug)]
pub struct ChannelObserver<S> {
    sender: Sender<ProgressEvent<S>>,
}

impl<S> ChannelObserver<S> {
    /// Wrap the sending half of a channel.
    pub fn new(sender: Sender<ProgressEvent<S>>) -> Self {
        Self { sender }
    }
}

impl<S: Clone> ProgressObserver<S> for ChannelObserver<S> {
    fn on_iteration(&mut self, iteration: usize, total: usize, stats: &S) {
        let _ = self.sender.send(ProgressEvent {
            iteration,
            total,
            stats: stats.clone(),
        });
    }
}
