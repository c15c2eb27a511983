//! In-memory login throttling keyed by client identity.
//!
//! Each key gets a fixed window that opens on its first attempt. Inside the
//! window the key may make `max_attempts` attempts; once the window has passed
//! the next attempt opens a fresh one.
//!
//! Scaling: records live in process memory. Several replicas each keep their
//! own map, so the effective budget per client is multiplied by the replica
//! count. A shared store would be needed to enforce a global limit.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::warn;

/// Source of the current time for window bookkeeping.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// Longest window honoured; larger ones are clamped so the reset instant
// stays representable.
const MAX_WINDOW: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Clone, Copy, Debug)]
struct RateRecord {
    attempts: u32,
    window_reset_at: Instant,
}

impl RateRecord {
    fn open(now: Instant, window: Duration) -> Self {
        Self {
            attempts: 1,
            window_reset_at: now
                .checked_add(window.min(MAX_WINDOW))
                .unwrap_or(now),
        }
    }

    fn is_active(&self, now: Instant) -> bool {
        now <= self.window_reset_at
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    records: Mutex<HashMap<String, RateRecord>>,
    max_tracked_keys: Option<usize>,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            max_tracked_keys: None,
            clock,
        }
    }

    /// Cap the number of distinct keys held at once. `0` means unbounded.
    #[must_use]
    pub fn with_max_tracked_keys(mut self, max: usize) -> Self {
        self.max_tracked_keys = (max > 0).then_some(max);
        self
    }

    /// Count an attempt for `key` and report whether it is allowed.
    ///
    /// The check and the increment happen under one lock, so an allowed
    /// attempt is always recorded. A blocked attempt leaves the record as is.
    pub fn allow(&self, key: &str, max_attempts: u32, window: Duration) -> bool {
        let now = self.clock.now();
        let mut records = self.lock();

        match records.get_mut(key) {
            Some(record) if record.is_active(now) => {
                if record.attempts < max_attempts {
                    record.attempts += 1;
                    true
                } else {
                    false
                }
            }
            Some(record) => {
                *record = RateRecord::open(now, window);
                true
            }
            None => {
                if let Some(max) = self.max_tracked_keys {
                    if records.len() >= max {
                        records.retain(|_, record| record.is_active(now));
                    }
                    if records.len() >= max {
                        evict_oldest(&mut records);
                        warn!("Rate limiter is tracking {max} clients, evicted the oldest record");
                    }
                }
                records.insert(key.to_string(), RateRecord::open(now, window));
                true
            }
        }
    }

    /// Drop records whose window has passed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| record.is_active(now));
        before - records.len()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    // Records are plain counters, nothing is left half-written by a panic.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Drop the record whose window closes first.
fn evict_oldest(records: &mut HashMap<String, RateRecord>) {
    let oldest = records
        .iter()
        .min_by_key(|(_, record)| record.window_reset_at)
        .map(|(key, _)| key.clone());
    if let Some(key) = oldest {
        records.remove(&key);
    }
}

#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
