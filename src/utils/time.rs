//! Wall-clock access for sample and prediction timestamps
//!
//! Every timestamp in the crate is milliseconds since the Unix epoch. The
//! simulator and session recorder read the clock through [`TimeProvider`] so
//! tests can pin or advance time deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds in one minute, used by history window queries
pub const MILLIS_PER_MINUTE: u64 = 60_000;

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;

    /// Current time in whole seconds since the Unix epoch
    fn now_secs(&self) -> u64 {
        self.now_millis() / 1000
    }
}

/// System time provider using the actual system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> u64 {
        current_timestamp_millis()
    }
}

/// Mock time provider for deterministic testing
#[derive(Debug)]
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    /// Create a clock frozen at `initial_time_millis`
    pub fn new(initial_time_millis: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_millis),
        }
    }

    /// Move the clock forward
    pub fn advance_by(&self, millis: u64) {
        self.current_time.fetch_add(millis, Ordering::Relaxed);
    }

    /// Jump the clock to an absolute time
    pub fn set_time(&self, millis: u64) {
        self.current_time.store(millis, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_millis(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Oldest timestamp still inside a window of `window_minutes` ending at `now_millis`.
///
/// Negative or NaN windows collapse to `now_millis`; windows reaching past
/// the epoch saturate at zero.
pub fn window_cutoff_millis(now_millis: u64, window_minutes: f64) -> u64 {
    if window_minutes.is_nan() || window_minutes <= 0.0 {
        return now_millis;
    }
    let span = (window_minutes * MILLIS_PER_MINUTE as f64).round();
    if span >= now_millis as f64 {
        0
    } else {
        now_millis - span as u64
    }
}
