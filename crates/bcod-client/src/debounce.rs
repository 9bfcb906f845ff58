//! Single-slot debouncing for the search input, and view generations for
//! discarding stale in-flight fetches.
//!
//! The debouncer holds at most one pending fire: a new call cancels and
//! replaces whatever was waiting, so a burst of keystrokes produces one
//! request after the quiet period, not one per keystroke.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct Debouncer {
    quiet_period: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: Mutex::new(None),
        }
    }

    /// Schedules `task` to run after the quiet period, cancelling any
    /// previously scheduled task that has not fired yet.
    pub fn call<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let quiet_period = self.quiet_period;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            task.await;
        });
        if let Ok(mut slot) = self.pending.lock() {
            if let Some(previous) = slot.replace(handle) {
                previous.abort();
            }
        }
    }

    /// Cancels a pending fire, if any.
    pub fn cancel(&self) {
        if let Ok(mut slot) = self.pending.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Monotonic view-lifetime counter.
///
/// A navigation bumps the generation; a fetch started under an older
/// generation checks [`Generation::is_current`] before committing its
/// result, so a stale response never lands in the new view's state.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tag a fetch should carry while in flight.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Invalidates every fetch tagged with an earlier generation.
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }

    #[must_use]
    pub fn is_current(&self, tag: u64) -> bool {
        self.current() == tag
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_of_calls_fires_exactly_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(700));

        for _ in 0..5 {
            let fired = fired.clone();
            debouncer.call(async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            // Keystrokes 100 ms apart, all inside the quiet window.
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_quiet_periods_fire_separately() {
        let fired = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(700));

        for _ in 0..2 {
            let fired = fired.clone();
            debouncer.call(async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(800)).await;
        }

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_the_pending_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(700));

        let counter = fired.clone();
        debouncer.call(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn generation_invalidates_earlier_tags() {
        let generation = Generation::new();
        let tag = generation.current();
        assert!(generation.is_current(tag));
        generation.bump();
        assert!(!generation.is_current(tag));
        assert!(generation.is_current(generation.current()));
    }
}
