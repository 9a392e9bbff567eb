//! Fixed-cadence pacing.

use std::time::Duration;

use super::clock::Clock;

/// Paces a loop at a fixed period against a monotonic deadline.
///
/// Each [`sleep`](LoopRate::sleep) blocks until the next deadline and
/// then advances it by one period, so loop bodies that finish early all
/// land on the same grid. A body that overruns its period re-anchors the
/// schedule at the current instant instead of trying to catch up.
#[derive(Debug)]
pub struct LoopRate {
    period: Duration,
    deadline: Duration,
}

impl LoopRate {
    /// Creates a pacer with the given `period`, anchored at monotonic
    /// instant `start`.
    pub fn new(period: Duration, start: Duration) -> Self {
        Self {
            period,
            deadline: start + period,
        }
    }

    /// Creates a pacer running at `hz` cycles per second. A zero rate
    /// cannot be paced and is clamped to 1 Hz.
    pub fn from_hz(hz: u32, start: Duration) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1), start)
    }

    /// Returns the pacing period.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps until the next deadline.
    ///
    /// Returns `false` when the deadline already passed; no sleep happens
    /// and the schedule re-anchors one period from now.
    pub fn sleep<C: Clock>(&mut self, clock: &C) -> bool {
        let now = clock.monotonic();
        if now <= self.deadline {
            clock.sleep(self.deadline - now);
            self.deadline += self.period;
            true
        } else {
            self.deadline = now + self.period;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::clock::ManualClock;
    use super::*;

    #[test]
    fn test_sleeps_cover_remainder_of_period() {
        let clock = ManualClock::new();
        let mut rate = LoopRate::from_hz(10, clock.monotonic());

        clock.advance(Duration::from_millis(30));
        assert!(rate.sleep(&clock));

        clock.advance(Duration::from_millis(10));
        assert!(rate.sleep(&clock));

        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(70), Duration::from_millis(90)]
        );
        assert_eq!(clock.monotonic(), Duration::from_millis(200));
    }

    #[test]
    fn test_overrun_reanchors_without_sleeping() {
        let clock = ManualClock::new();
        let mut rate = LoopRate::from_hz(10, clock.monotonic());

        clock.advance(Duration::from_millis(150));
        assert!(!rate.sleep(&clock));
        assert!(clock.sleeps().is_empty());

        // Deadline re-anchored to 250ms.
        clock.advance(Duration::from_millis(50));
        assert!(rate.sleep(&clock));
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(50)]);
        assert_eq!(clock.monotonic(), Duration::from_millis(250));
    }

    #[test]
    fn test_from_hz_derives_period() {
        let start = Duration::ZERO;
        assert_eq!(
            LoopRate::from_hz(10, start).period(),
            Duration::from_millis(100)
        );
        assert_eq!(
            LoopRate::from_hz(0, start).period(),
            Duration::from_secs(1)
        );
    }
}
