use std::time::{Duration, Instant};

pub mod leader_status_watcher;
pub mod watchdog_handler;

/// Single-shot resettable timer. Expiry means no recent heartbeat or election activity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FailureDetector {
    interval: Duration,
    expires_at: Instant,
}

impl FailureDetector {
    /// Creates the detector armed with the interval.
    pub fn new(interval: Duration, now: Instant) -> FailureDetector {
        FailureDetector {
            interval,
            expires_at: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancels the pending expiry and re-arms with the duration.
    pub fn reset(&mut self, now: Instant, duration: Duration) {
        self.expires_at = now + duration;
    }

    /// Re-arms with the interval drawn at start-up.
    pub fn rearm(&mut self, now: Instant) {
        let interval = self.interval;
        self.reset(now, interval);
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
