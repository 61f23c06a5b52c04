use std::time::{Duration, Instant};

/// Monotonic stopwatch with restart semantics.
///
/// `restart` returns the time accumulated since the previous restart and begins
/// a new measurement in the same step, so no interval is counted twice.
#[derive(Debug, Clone)]
pub struct ElapsedTimer {
    start: Instant,
}

impl ElapsedTimer {
    /// Starts measuring now.
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Starts measuring from `start`.
    pub fn started_at(start: Instant) -> Self {
        Self { start }
    }

    /// Time elapsed since the last (re)start.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    /// Returns the elapsed time and restarts the measurement.
    pub fn restart(&mut self) -> Duration {
        self.restart_at(Instant::now())
    }

    pub fn restart_at(&mut self, now: Instant) -> Duration {
        let elapsed = self.elapsed_at(now);
        self.start = now;
        elapsed
    }
}

impl Default for ElapsedTimer {
    fn default() -> Self {
        Self::new()
    }
}
