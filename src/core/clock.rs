//! core::clock
//!
//! Millisecond timestamp source used for fallback and disambiguation
//! suffixes.
//!
//! # Invariants
//!
//! - [`SystemClock`] never returns the same or a smaller value twice, even
//!   when called twice within one wall-clock millisecond.
//! - Suffix digits are always the low decimal digits of a non-negative value.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of millisecond timestamps.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock, forced to be strictly increasing.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        let wall = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Intended for tests; the first read returns `start`.
#[derive(Debug)]
pub struct SteppingClock {
    next: AtomicI64,
    step: i64,
}

impl SteppingClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}

/// Most digits [`last_digits`] renders; `10^18` still fits in an `i64`.
pub const MAX_LAST_DIGITS: u32 = 18;

/// Render the last `digits` decimal digits of `millis`, zero-padded.
///
/// `digits` is capped at [`MAX_LAST_DIGITS`].
///
/// ```
/// use cardmint::core::clock::last_digits;
///
/// assert_eq!(last_digits(1_700_000_004_821, 4), "4821");
/// assert_eq!(last_digits(1_700_000_000_007, 4), "0007");
/// ```
pub fn last_digits(millis: i64, digits: u32) -> String {
    let digits = digits.clamp(1, MAX_LAST_DIGITS);
    let modulus = 10_i64.pow(digits);
    format!(
        "{:0width$}",
        millis.rem_euclid(modulus),
        width = digits as usize
    )
}
