use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Same,
}

/// Percent change from `previous` to `current`, rounded to 2 decimals with
/// exact halves going to the even digit. Returns 0 when `previous` is 0.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let pct = (current - previous) / previous * 100.0;
    (pct * 100.0).round_ties_even() / 100.0
}

pub fn direction(previous: f64, current: f64) -> Direction {
    if current > previous {
        Direction::Up
    } else if current < previous {
        Direction::Down
    } else {
        Direction::Same
    }
}

/// Last-seen price per key, kept for the lifetime of the process.
///
/// Keys are never evicted. `observe` reads and writes under separate lock
/// acquisitions, so two requests racing on one key may both see the same
/// previous price; the last writer wins.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    last_seen: Mutex<HashMap<String, f64>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored price for `key` (or `price` on first sight), then
    /// store `price`.
    pub fn observe(&self, key: &str, price: f64) -> f64 {
        let previous = self.lock().get(key).copied().unwrap_or(price);

        let mut map = self.lock();
        if map.insert(key.to_string(), price).is_none() {
            tracing::debug!(key, tracked = map.len(), "tracking new odds key");
        }
        previous
    }

    /// Observe `price` and return its percent change against the last one.
    pub fn percent_change(&self, key: &str, price: f64) -> f64 {
        percent_change(self.observe(key, price), price)
    }

    /// Observe `price` and return which way it moved.
    pub fn direction(&self, key: &str, price: f64) -> Direction {
        direction(self.observe(key, price), price)
    }

    pub fn last_price(&self, key: &str) -> Option<f64> {
        self.lock().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn reset(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock leaves the map consistent (single
    // get or insert), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, f64>> {
        self.last_seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
