//! Request pacing
//!
//! Enforces the minimum spacing between requests. The spacing is measured
//! from the end of the previous fetch, so a slow response never shortens
//! the pause before the next one.

use std::time::{Duration, Instant};

/// Sequential rate limiter for a single worker
#[derive(Debug, Clone)]
pub struct Pacer {
    /// Minimum time between the end of one fetch and the start of the next
    delay: Duration,

    /// When the previous fetch finished
    last_fetch_end: Option<Instant>,
}

impl Pacer {
    /// Creates a pacer with the given spacing
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_fetch_end: None,
        }
    }

    /// Returns the spacing being enforced
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Calculates how long to wait before the next request may start
    ///
    /// # Returns
    ///
    /// * `Some(Duration)` - Time remaining until the next request
    /// * `None` - A request can start now
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_fetch_end?;
        let ready_at = last + self.delay;
        if ready_at > now {
            Some(ready_at - now)
        } else {
            None
        }
    }

    /// Sleeps until the next request may start
    pub async fn wait(&self) {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Pacing: sleeping {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that a fetch just finished
    pub fn record_fetch_end(&mut self, at: Instant) {
        self.last_fetch_end = Some(at);
    }
}
