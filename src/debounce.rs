//! Deadline-based debouncing
//!
//! A [`Debouncer`] holds at most one pending value. Every push replaces it
//! and moves the deadline; the value is released once input has been quiet
//! for the configured wait.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Default quiet period for search input
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(220);

/// Coalesces rapid updates into the latest value
#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// Creates a debouncer releasing values after `wait` without new pushes
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Replaces the pending value and restarts the wait
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.wait));
    }

    /// Returns true if a value is waiting to be released
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Removes and returns the pending value without waiting
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Waits for the deadline and releases the pending value
    ///
    /// Never resolves while nothing is pending, which makes it usable as a
    /// branch of `tokio::select!`. Cancel-safe: dropping the future keeps
    /// the pending value.
    pub async fn ready(&mut self) -> T {
        let deadline = match &self.pending {
            Some((_, deadline)) => *deadline,
            None => std::future::pending().await,
        };

        sleep_until(deadline).await;

        match self.pending.take() {
            Some((value, _)) => value,
            None => std::future::pending().await,
        }
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
