//! Lock-free counters shared with the gossip broadcast/listen loops.
//!
//! The broadcast loop increments [`RateCounters::record_announcement`] and
//! the listen loop increments [`RateCounters::record_integration`]; neither
//! holds a lock across its I/O. The controller alone drains both counters
//! once per adjustment tick via `take()`, so there is exactly one reader.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct RateCounters {
    announcements: AtomicU64,
    integrations: AtomicU64,
}

impl RateCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_announcement(&self) {
        self.announcements.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_integration(&self) {
        self.integrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Read-and-zero both counters, returning `(announcements, integrations)`.
    pub fn take(&self) -> (u64, u64) {
        (
            self.announcements.swap(0, Ordering::Relaxed),
            self.integrations.swap(0, Ordering::Relaxed),
        )
    }
}

/// The one atomic scalar the controller writes and every other task reads.
///
/// Stored as the raw bit pattern of an `f64` behind an `AtomicU64` so reads
/// never block on a lock; a reader may observe the previous tick's value
/// for up to one tick, which spec section 5 calls acceptable.
pub struct IntervalCell(AtomicU64);

impl IntervalCell {
    pub fn new(initial_secs: f64) -> Self {
        Self(AtomicU64::new(initial_secs.to_bits()))
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, secs: f64) {
        self.0.store(secs.to_bits(), Ordering::Relaxed);
    }
}
