//! Elapsed-time bookkeeping for frame-rate independent animation.

use std::time::{Duration, Instant};

/// Accumulates wall-clock time across frames.
///
/// Created once at startup and ticked once per frame. The caller supplies
/// `now` so frame timing stays explicit and testable.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start_time: Instant,
    last_time: Instant,
    elapsed: Duration,
}

impl Clock {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            last_time: start_time,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances to `now` and returns the cumulative elapsed time.
    ///
    /// `now` must not go backwards between calls. If it does, the delta
    /// saturates to zero and `elapsed` is left unchanged.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_time);
        self.elapsed += delta;
        self.last_time = now;
        self.elapsed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn last_time(&self) -> Instant {
        self.last_time
    }
}
