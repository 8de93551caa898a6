use rand::Rng;
use tokio::time::Duration;
use tokio::time::Instant;

use crate::config::IntervalRange;

/// Refresh deadline redrawn uniformly from a window on every reset.
#[derive(Clone, Debug)]
pub struct JitteredInterval {
    next_deadline: Instant,
    range: IntervalRange,
}

impl JitteredInterval {
    /// Starts with a deadline of "now": the first refresh is immediate.
    pub fn new(range: IntervalRange) -> Self {
        Self {
            next_deadline: Instant::now(),
            range,
        }
    }

    /// Draws a fresh delay and moves the deadline that far past now.
    pub fn reset(&mut self) -> Duration {
        let delay = Self::random_duration(self.range);
        self.next_deadline = Instant::now() + delay;
        delay
    }

    pub fn random_duration(range: IntervalRange) -> Duration {
        let mut rng = rand::thread_rng();
        let millis = rng.gen_range(range.min_ms..=range.max_ms);
        Duration::from_millis(millis)
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }
}
