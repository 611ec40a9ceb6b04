//! Monotonic timestamps for samples.
//!
//! The chart only cares about elapsed time, so samples are stamped with a
//! `Duration` since the monitor started rather than a wall-clock time.

use std::time::{Duration, Instant};

/// Clock shared by the sensors and the monitor loop.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self { Self { origin: Instant::now() } }

    /// Time since [`start`](Self::start).
    #[inline]
    pub fn now(&self) -> Duration { self.origin.elapsed() }
}

/// Sleep for whatever is left of `interval` after `elapsed`.
///
/// Returns the time actually slept (zero when the iteration overran).
pub fn sleep_remaining(
    interval: Duration,
    elapsed: Duration,
) -> Duration {
    match interval.checked_sub(elapsed) {
        Some(remaining) if !remaining.is_zero() => {
            std::thread::sleep(remaining);
            remaining
        }
        _ => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = MonotonicClock::start();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_overrun_does_not_sleep() {
        let slept = sleep_remaining(Duration::from_millis(10), Duration::from_millis(25));
        assert_eq!(slept, Duration::ZERO);
    }

    #[test]
    fn test_sleeps_for_remainder() {
        let slept = sleep_remaining(Duration::from_millis(12), Duration::from_millis(10));
        assert_eq!(slept, Duration::from_millis(2));
    }
}
