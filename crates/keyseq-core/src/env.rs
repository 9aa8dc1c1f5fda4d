//! Environment abstraction for deterministic testing.
//!
//! Decouples the interpreter from wall-clock time and from the async
//! scheduler. Production uses [`SystemEnv`] (tokio time); the simulation
//! harness supplies a virtual clock so waits complete instantly but remain
//! observable.

use std::{future::Future, time::Duration};

/// Abstract environment providing time and cooperative suspension.
///
/// # Invariants
///
/// - `now()` never goes backwards
/// - `sleep(d)` resolves no earlier than `d` after it was awaited, measured
///   by `now()`
pub trait Environment: Clone + Send + Sync + 'static {
    /// Instant type. Real or virtual.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Suspend for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Give other tasks a chance to run before continuing.
    ///
    /// Called after each dispatch so code under test can react to an event
    /// before the next one fires.
    fn yield_now(&self) -> impl Future<Output = ()> + Send;
}

/// Production environment backed by the tokio runtime.
///
/// Uses tokio's clock, so tests built with `start_paused = true` auto-advance
/// through waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn yield_now(&self) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}
