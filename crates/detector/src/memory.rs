//! Wall notification memory
//!
//! Remembers, per `(side, price key)`, when a wall was last notified and
//! at which amount. Unlike a plain map it is bounded: entries older than
//! the retention window are pruned, and the map never holds more than its
//! capacity (oldest notification evicted first).

use std::collections::HashMap;
use std::time::Duration;

use depthwatch_core::{BookSide, Price, Quantity, Timestamp, format_fixed};

/// Default upper bound on remembered price levels
pub const DEFAULT_CAPACITY: usize = 4096;

/// Memory key for a price: the price rendered with two decimals
pub fn price_key(price: Price) -> String {
    format_fixed(price, 2)
}

/// Last notification recorded for a price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallRecord {
    pub last_notified_at: Timestamp,
    pub last_amount: Quantity,
}

/// Bounded per-level notification history
#[derive(Debug, Clone)]
pub struct WallMemory {
    entries: HashMap<(BookSide, String), WallRecord>,
    capacity: usize,
}

impl Default for WallMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl WallMemory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a memory holding at most `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, side: BookSide, key: &str) -> Option<&WallRecord> {
        self.entries.get(&(side, key.to_string()))
    }

    /// Record a notification, evicting the oldest entry if full
    pub fn record(&mut self, side: BookSide, key: String, at: Timestamp, amount: Quantity) {
        let entry_key = (side, key);
        if !self.entries.contains_key(&entry_key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            entry_key,
            WallRecord {
                last_notified_at: at,
                last_amount: amount,
            },
        );
    }

    /// Drop entries last notified more than `retention` before `now`
    ///
    /// Returns the number of evicted entries.
    pub fn prune(&mut self, now: Timestamp, retention: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, record| match (now - record.last_notified_at).to_std() {
            Ok(age) => age <= retention,
            // Notified "in the future" (clock stepped back): keep
            Err(_) => true,
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            log::debug!("Pruned {} stale wall memory entries", evicted);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, record)| record.last_notified_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
