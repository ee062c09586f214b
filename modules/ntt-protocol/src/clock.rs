//! Time source for the protocol state machines.
//!
//! Rate-limit and queue logic never reads the time itself: it is handed a
//! `now` taken from a [`Clock`]. Adapters hold the clock, so tests and
//! simulations can drive time explicitly with [`ManualClock`].

use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

/// Seconds since the Unix epoch.
pub type UnixTimestamp = i64;

pub trait Clock: Send + Sync {
    fn now(&self) -> UnixTimestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|elapsed| UnixTimestamp::try_from(elapsed.as_secs()).ok())
            .unwrap_or_default()
    }
}

/// A settable clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn new(timestamp: UnixTimestamp) -> Self {
        Self(Arc::new(AtomicI64::new(timestamp)))
    }

    pub fn set(&self, timestamp: UnixTimestamp) {
        self.0.store(timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UnixTimestamp {
        self.0.load(Ordering::SeqCst)
    }
}
