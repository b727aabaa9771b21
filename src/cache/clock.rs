//! Time source for snapshot expiry.

use chrono::{DateTime, Utc};

/// Supplies the current time to the cache.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
/// Manually advanced clock. Clones share the same time.
pub struct MockClock {
    now: std::sync::Arc<parking_lot::Mutex<DateTime<Utc>>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Arc::new(parking_lot::Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: std::time::Duration) {
        let delta = chrono::TimeDelta::from_std(by).expect("duration out of range");
        *self.now.lock() += delta;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }
}

#[cfg(any(test, feature = "mock"))]
impl Default for MockClock {
    fn default() -> Self {
        Self::new(DateTime::UNIX_EPOCH)
    }
}

#[cfg(any(test, feature = "mock"))]
impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
