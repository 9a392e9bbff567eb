//! Injected time sources.
//!
//! The acquisition loop never calls the system clock directly. It takes a
//! [`Clock`] for message stamps, cadence arithmetic, and sleeping, so
//! tests drive time by hand with [`ManualClock`] while production runs on
//! [`SystemClock`].

use std::cell::RefCell;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Source of wall-clock stamps, monotonic readings, and sleeps.
pub trait Clock {
    /// Wall-clock time, used to stamp outgoing messages.
    fn now(&self) -> DateTime<Utc>;

    /// Monotonic reading since an arbitrary origin, used for cadence
    /// arithmetic. Never goes backwards.
    fn monotonic(&self) -> Duration;

    /// Blocks the caller for `duration`.
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn monotonic(&self) -> Duration {
        (**self).monotonic()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose monotonic origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Default)]
struct ManualState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Hand-driven clock for tests.
///
/// Time only moves when the code under test sleeps or the test calls
/// [`advance`](ManualClock::advance). Every sleep is recorded for
/// cadence assertions.
#[derive(Debug)]
pub struct ManualClock {
    base: DateTime<Utc>,
    state: RefCell<ManualState>,
}

impl ManualClock {
    /// Creates a clock reading `base` at zero elapsed time.
    pub fn starting_at(base: DateTime<Utc>) -> Self {
        Self {
            base,
            state: RefCell::new(ManualState::default()),
        }
    }

    /// Creates a clock starting at the Unix epoch.
    pub fn new() -> Self {
        Self::starting_at(DateTime::UNIX_EPOCH)
    }

    /// Moves time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.state.borrow_mut().elapsed += duration;
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + self.state.borrow().elapsed
    }

    fn monotonic(&self) -> Duration {
        self.state.borrow().elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.elapsed += duration;
        state.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_on_sleep() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), DateTime::UNIX_EPOCH);

        clock.sleep(Duration::from_millis(100));

        assert_eq!(clock.monotonic(), Duration::from_millis(100));
        assert_eq!(
            clock.now(),
            DateTime::UNIX_EPOCH + Duration::from_millis(100)
        );
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(100)]);
    }

    #[test]
    fn test_manual_advance_records_no_sleep() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(50));

        assert_eq!(clock.monotonic(), Duration::from_millis(50));
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_borrowed_clock_still_a_clock() {
        fn elapsed_of(clock: impl Clock) -> Duration {
            clock.monotonic()
        }

        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(7));
        assert_eq!(elapsed_of(&clock), Duration::from_millis(7));
    }

    #[test]
    fn test_system_clock_monotonic_never_regresses() {
        let clock = SystemClock::new();
        let first = clock.monotonic();
        let second = clock.monotonic();
        assert!(second >= first);
    }
}
