use std::time::{Duration, Instant};

/// Snapshot handed to the application when the periodic tick fires.
#[derive(Debug, Copy, Clone)]
pub struct TickTime {
    /// Monotonic timestamp taken when the tick fired.
    pub now: Instant,

    /// Monotonic tick counter.
    pub tick_index: u64,
}

/// Periodic timer polled by the event loop.
///
/// The next deadline is always measured from the moment a tick fires, so a
/// stalled loop produces one late tick instead of a burst of catch-up ticks.
/// A zero interval fires on every poll.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    next_due: Option<Instant>,
    tick_index: u64,
}

impl IntervalTimer {
    /// Creates a stopped timer.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            tick_index: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arms the timer; the first tick is due one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Next instant at which `poll` will fire, if the timer is running.
    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Fires the tick if it is due and re-arms the timer.
    pub fn poll(&mut self, now: Instant) -> Option<TickTime> {
        let due = self.next_due?;
        if now < due {
            return None;
        }

        self.next_due = Some(now + self.interval);

        let tick = TickTime {
            now,
            tick_index: self.tick_index,
        };
        self.tick_index = self.tick_index.wrapping_add(1);
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn stopped_timer_never_fires() {
        let mut timer = IntervalTimer::new(16 * MS);
        assert!(!timer.is_active());
        assert!(timer.poll(Instant::now()).is_none());
    }

    #[test]
    fn fires_once_deadline_passes() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(16 * MS);
        timer.start(t0);

        assert!(timer.poll(t0 + 10 * MS).is_none());

        let tick = timer.poll(t0 + 16 * MS).unwrap();
        assert_eq!(tick.tick_index, 0);
        assert_eq!(timer.deadline(), Some(t0 + 32 * MS));
    }

    #[test]
    fn late_poll_rearms_from_fire_time() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(16 * MS);
        timer.start(t0);

        let late = t0 + 100 * MS;
        assert!(timer.poll(late).is_some());
        // No catch-up burst.
        assert!(timer.poll(late + MS).is_none());
        assert_eq!(timer.deadline(), Some(late + 16 * MS));
    }

    #[test]
    fn zero_interval_fires_every_poll() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(Duration::ZERO);
        timer.start(t0);

        assert_eq!(timer.poll(t0).map(|t| t.tick_index), Some(0));
        assert_eq!(timer.poll(t0).map(|t| t.tick_index), Some(1));
    }

    #[test]
    fn stop_disarms() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(MS);
        timer.start(t0);
        timer.stop();
        assert!(timer.poll(t0 + 10 * MS).is_none());
    }
}
