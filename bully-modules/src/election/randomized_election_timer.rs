use bully::ElectionTimer;
use rand::Rng;
use std::time::Duration;

/// Provides random time duration within a range, in discrete steps.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RandomizedElectionTimer {
    range_start_ms: u64,
    range_stop_ms: u64,
    step_ms: u64,
}

impl RandomizedElectionTimer {
    /// Creates new RandomizedElectionTimer with the inclusive time range and the step
    /// in milliseconds.
    pub fn new(range_start_ms: u64, range_stop_ms: u64, step_ms: u64) -> RandomizedElectionTimer {
        if range_start_ms > range_stop_ms || range_stop_ms == 0 || step_ms == 0 {
            panic!(
                "Invalid params: range_start_ms : {}, range_stop_ms : {}, step_ms : {}",
                range_start_ms, range_stop_ms, step_ms
            )
        }
        RandomizedElectionTimer {
            range_start_ms,
            range_stop_ms,
            step_ms,
        }
    }

    fn step_count(&self) -> u64 {
        (self.range_stop_ms - self.range_start_ms) / self.step_ms + 1
    }
}

/// Ten steps of 500 ms starting at 5 seconds.
impl Default for RandomizedElectionTimer {
    fn default() -> Self {
        RandomizedElectionTimer::new(5000, 9500, 500)
    }
}

impl ElectionTimer for RandomizedElectionTimer {
    fn next_elections_timeout(&self) -> Duration {
        let mut rng = rand::thread_rng();
        let step = rng.gen_range(0, self.step_count());

        Duration::from_millis(self.range_start_ms + step * self.step_ms)
    }
}
