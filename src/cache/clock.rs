//! Wall-clock source for freshness checks.
//!
//! Injected so tests can move time explicitly instead of sleeping.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock (`Utc::now()`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Start at a millisecond offset from the Unix epoch.
    pub fn at_millis(millis: i64) -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(millis))
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn advance_millis(&self, millis: i64) {
        self.advance(Duration::milliseconds(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::at_millis(1_000);
        let view = clock.clone();
        clock.advance_millis(250);
        assert_eq!(view.now().timestamp_millis(), 1_250);
    }
}
