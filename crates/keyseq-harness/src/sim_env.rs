//! Virtual clock environment.
//!
//! `SimEnv` implements [`Environment`] with a clock that only moves when a
//! wait sleeps on it. Waits complete immediately in real time, yet the
//! recorded timestamps show exactly how long each pause lasted, making
//! timing assertions deterministic.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use keyseq_core::Environment;

/// Deterministic environment with a virtual clock.
///
/// Clones share the clock, so a [`crate::RecordingDispatcher`] built from a
/// clone timestamps events on the same timeline the interpreter sleeps on.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    elapsed_micros: Arc<AtomicU64>,
    sleeps: Arc<AtomicU64>,
}

impl SimEnv {
    /// Create an environment with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_micros.load(Ordering::SeqCst))
    }

    /// Advance the clock without sleeping.
    pub fn advance(&self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.elapsed_micros.fetch_add(micros, Ordering::SeqCst);
    }

    /// Number of sleeps performed so far.
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Environment for SimEnv {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        let env = self.clone();
        async move {
            env.sleeps.fetch_add(1, Ordering::SeqCst);
            env.advance(duration);
            tokio::task::yield_now().await;
        }
    }

    fn yield_now(&self) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sleep_advances_virtual_clock() {
        let env = SimEnv::new();

        env.sleep(Duration::from_millis(50)).await;
        env.sleep(Duration::from_millis(25)).await;

        assert_eq!(env.now(), Duration::from_millis(75));
        assert_eq!(env.sleep_count(), 2);
    }

    #[tokio::test]
    async fn clones_share_the_clock() {
        let env = SimEnv::new();
        let other = env.clone();

        other.sleep(Duration::from_millis(10)).await;

        assert_eq!(env.elapsed(), Duration::from_millis(10));
    }

    #[test]
    fn advance_does_not_count_as_sleep() {
        let env = SimEnv::new();
        env.advance(Duration::from_millis(3));

        assert_eq!(env.now(), Duration::from_millis(3));
        assert_eq!(env.sleep_count(), 0);
    }
}
