use std::time::Duration;

/// Elapsed time after which `timing_check` reports a timing anomaly.
pub const DEFAULT_TIMING_THRESHOLD: Duration = Duration::from_secs(2);

/// Multiplier of the dispatch key transform.
pub const DISPATCH_KEY_MULTIPLIER: i64 = 17;

/// Offset of the dispatch key transform.
pub const DISPATCH_KEY_OFFSET: i64 = 3;

/// Modulus of the dispatch key transform, and so the size of the key space.
pub const DISPATCH_KEY_SPACE: i64 = 50;

/// A step limit of zero means the run is not budgeted.
pub const UNLIMITED_STEPS: u64 = 0;
