//=========================================================================
// Time Sources
//=========================================================================
//
// Monotonic time and sleeping, behind a trait so the loop can run on
// wall time or on a manually advanced clock.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

//=== TimeSource ==========================================================

/// Monotonic clock the frame loop measures and sleeps with.
pub trait TimeSource {
    /// Time elapsed since the source was created.
    fn now(&self) -> Duration;

    /// Blocks (or pretends to) for `duration`.
    fn sleep(&self, duration: Duration);
}

//=== WallClock ===========================================================

/// Real time, backed by [`Instant`] and [`thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

//=== ManualTime ==========================================================

/// Deterministic clock advanced by hand.
///
/// Clones share the same time, so a test (or a replay driver) can keep a
/// handle while the loop owns another. Sleeping advances the clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Duration>>,
    slept: Rc<Cell<Duration>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get() + step);
    }

    /// Total time spent in [`TimeSource::sleep`].
    pub fn total_slept(&self) -> Duration {
        self.slept.get()
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + duration);
        self.advance(duration);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_time_clones_share_state() {
        let time = ManualTime::new();
        let handle = time.clone();

        handle.advance(Duration::from_millis(5));

        assert_eq!(time.now(), Duration::from_millis(5));
    }

    #[test]
    fn manual_sleep_advances_and_records() {
        let time = ManualTime::new();

        time.sleep(Duration::from_millis(3));
        time.advance(Duration::from_millis(1));

        assert_eq!(time.now(), Duration::from_millis(4));
        assert_eq!(time.total_slept(), Duration::from_millis(3));
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let clock = WallClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
