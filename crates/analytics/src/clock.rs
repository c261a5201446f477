//! Time source for cache expiry.

use std::{fmt, time::Duration};

use jiff::{SignedDuration, Timestamp};

/// Source of the current time. Caches judge expiry against it, so tests can
/// move time forward without sleeping.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// `start + ttl`, saturating at the largest representable timestamp.
pub(crate) fn deadline(start: Timestamp, ttl: Duration) -> Timestamp {
    SignedDuration::try_from(ttl)
        .ok()
        .and_then(|ttl| start.checked_add(ttl).ok())
        .unwrap_or(Timestamp::MAX)
}
