//! Monotonic clocks for the timing probe.
//!
//! The VM never reads the host clock directly; it reads an injected [`Clock`], so hosts and tests
//! can substitute a [`MockClock`] and drive the timing probe deterministically.

use std::{
    fmt::Debug,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// Monotonic time, measured as an offset from an arbitrary epoch.
pub trait Clock: Debug + Send + Sync {
    /// Get the current monotonic offset.
    fn now(&self) -> Duration;

    /// Get elapsed time since a previous monotonic point.
    fn elapsed(&self, since: Duration) -> Duration {
        self.now().saturating_sub(since)
    }
}

/// [`Clock`] backed by [`Instant`], with its epoch at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Mock clock for deterministic testing.
///
/// Time is a controllable nanosecond counter that only moves when [`MockClock::advance`] is
/// called.
///
/// ```
/// use std::time::Duration;
/// use warden_vm::core::clock::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now(), Duration::ZERO);
///
/// clock.advance(Duration::from_secs(1));
/// assert_eq!(clock.now(), Duration::from_secs(1));
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    offset_ns: AtomicU64,
}

impl MockClock {
    /// Create a new mock clock at offset zero.
    pub fn new() -> Self {
        Self { offset_ns: AtomicU64::new(0) }
    }

    /// Advance simulated time by a duration.
    pub fn advance(&self, duration: Duration) {
        let delta = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let _ = self.offset_ns.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            Some(current.saturating_add(delta))
        });
    }
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.offset_ns.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_advances() {
        let clock = MockClock::new();
        clock.advance(Duration::from_millis(1500));
        clock.advance(Duration::from_millis(700));
        assert_eq!(clock.now(), Duration::from_millis(2200));
        assert_eq!(clock.elapsed(Duration::from_millis(200)), Duration::from_secs(2));
    }

    #[test]
    fn test_elapsed_saturates() {
        let clock = MockClock::new();
        assert_eq!(clock.elapsed(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
