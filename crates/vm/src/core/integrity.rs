//! The tamper-detection layer.
//!
//! [`Integrity`] is a one-way latch: the first [`Violation`] recorded sets it, nothing clears it,
//! and the execution engine refuses to fetch another instruction once it is set. The timing probe
//! and both checksum opcodes report through it.

use std::{fmt, sync::Arc, time::Duration};

use tracing::warn;

use super::{
    clock::{Clock, MonotonicClock},
    constants::DEFAULT_TIMING_THRESHOLD,
    types::Word,
};

/// XOR-fold of `words`. The fold of an empty slice is 0.
///
/// ```
/// use warden_vm::core::integrity::fold;
///
/// assert_eq!(fold(&[]), 0);
/// assert_eq!(fold(&[0b1100, 0b1010]), 0b0110);
/// ```
pub fn fold(words: &[Word]) -> Word {
    words.iter().fold(0, |acc, word| acc ^ word)
}

/// The reason the integrity latch was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `timing_check` ran after the threshold had elapsed.
    TimingAnomaly {
        /// Time since the run started
        elapsed: Duration,
    },

    /// `checksum_check` folded a range to something other than the expected value.
    ChecksumMismatch {
        /// The value embedded in the program
        expected: Word,
        /// The value folded at run time
        actual: Word,
    },

    /// `add` ran while the first program word was neither `push` nor `push_junk`.
    ProgramShape {
        /// The first word of the program at the time
        first: Option<Word>,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TimingAnomaly { elapsed } => {
                write!(f, "timing anomaly ({elapsed:?} elapsed), debugger suspected")
            }
            Violation::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "checksum mismatch (expected {expected:#x}, found {actual:#x}), tampering detected"
                )
            }
            Violation::ProgramShape { first } => match first {
                Some(word) => write!(f, "unexpected program entry word {word}"),
                None => write!(f, "unexpected empty program"),
            },
        }
    }
}

/// Integrity state of a VM: the latch, the run's start time, and the clock it is measured on.
#[derive(Debug, Clone)]
pub struct Integrity {
    violation: Option<Violation>,
    started_at: Duration,
    threshold: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for Integrity {
    fn default() -> Self {
        Self::new(Arc::new(MonotonicClock::new()), DEFAULT_TIMING_THRESHOLD)
    }
}

impl Integrity {
    /// Creates a clear latch measuring time on `clock`.
    pub fn new(clock: Arc<dyn Clock>, threshold: Duration) -> Self {
        let started_at = clock.now();
        Self { violation: None, started_at, threshold, clock }
    }

    /// Captures the start time of a run.
    pub fn arm(&mut self) {
        self.started_at = self.clock.now();
    }

    /// Whether the latch has been set.
    pub fn failed(&self) -> bool {
        self.violation.is_some()
    }

    /// The violation that set the latch, if any.
    pub fn violation(&self) -> Option<Violation> {
        self.violation
    }

    /// The timing threshold.
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Time since the last [`Integrity::arm`].
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed(self.started_at)
    }

    /// Sets the latch. Only the first violation is kept.
    pub fn trip(&mut self, violation: Violation) {
        warn!("integrity violation: {violation}");
        if self.violation.is_none() {
            self.violation = Some(violation);
        }
    }

    /// The timing probe. Trips the latch if more than the threshold has elapsed since the run
    /// started, and returns whether it did.
    pub fn check_timing(&mut self) -> bool {
        let elapsed = self.elapsed();
        if elapsed > self.threshold {
            self.trip(Violation::TimingAnomaly { elapsed });
            return true;
        }
        false
    }

    /// Compares a folded checksum with the expected value, tripping the latch on mismatch.
    /// Returns whether the values matched.
    pub fn check_checksum(&mut self, expected: Word, actual: Word) -> bool {
        if expected != actual {
            self.trip(Violation::ChecksumMismatch { expected, actual });
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::MockClock;

    fn mock_integrity(threshold: Duration) -> (Arc<MockClock>, Integrity) {
        let clock = Arc::new(MockClock::new());
        let integrity = Integrity::new(clock.clone(), threshold);
        (clock, integrity)
    }

    #[test]
    fn test_fold_is_xor_of_all_words() {
        assert_eq!(fold(&[1, 2, 3]), 0);
        assert_eq!(fold(&[-1, 0x0f0f_0f0f]), !0x0f0f_0f0f);
    }

    #[test]
    fn test_timing_within_threshold() {
        let (clock, mut integrity) = mock_integrity(Duration::from_secs(2));
        integrity.arm();
        clock.advance(Duration::from_secs(2));
        assert!(!integrity.check_timing());
        assert!(!integrity.failed());
    }

    #[test]
    fn test_timing_past_threshold_trips() {
        let (clock, mut integrity) = mock_integrity(Duration::from_secs(2));
        integrity.arm();
        clock.advance(Duration::from_millis(2001));
        assert!(integrity.check_timing());
        assert_eq!(
            integrity.violation(),
            Some(Violation::TimingAnomaly { elapsed: Duration::from_millis(2001) })
        );
    }

    #[test]
    fn test_arm_resets_start_time() {
        let (clock, mut integrity) = mock_integrity(Duration::from_secs(1));
        clock.advance(Duration::from_secs(10));
        integrity.arm();
        assert_eq!(integrity.elapsed(), Duration::ZERO);
        assert!(!integrity.check_timing());
    }

    #[test]
    fn test_latch_keeps_first_violation() {
        let (_, mut integrity) = mock_integrity(Duration::from_secs(2));
        assert!(!integrity.check_checksum(1, 2));
        integrity.trip(Violation::ProgramShape { first: Some(5) });
        assert_eq!(
            integrity.violation(),
            Some(Violation::ChecksumMismatch { expected: 1, actual: 2 })
        );
    }

    #[test]
    fn test_matching_checksum_leaves_latch_clear() {
        let (_, mut integrity) = mock_integrity(Duration::from_secs(2));
        assert!(integrity.check_checksum(0x1234, 0x1234));
        assert!(!integrity.failed());
    }
}
