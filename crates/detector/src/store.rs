//! Snapshot Store
//!
//! Holds the last completed snapshot so the next cycle can diff against
//! it. Snapshots are immutable; the store only ever swaps whole `Arc`s, so
//! a reader never observes a partially replaced book.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use depthwatch_core::Snapshot;

#[derive(Default)]
pub struct SnapshotStore {
    previous: ArcSwapOption<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            previous: ArcSwapOption::const_empty(),
        }
    }

    /// Snapshot produced by the last completed cycle, if any
    pub fn previous(&self) -> Option<Arc<Snapshot>> {
        self.previous.load_full()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.load().is_some()
    }

    /// Make `current` the new previous snapshot, returning the one replaced
    pub fn replace(&self, current: Arc<Snapshot>) -> Option<Arc<Snapshot>> {
        self.previous.swap(Some(current))
    }

    /// Forget the previous snapshot (symbol switch, bucket width change)
    pub fn clear(&self) -> Option<Arc<Snapshot>> {
        self.previous.swap(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(symbol: &str) -> Arc<Snapshot> {
        Arc::new(Snapshot::new(symbol, dec!(10), vec![], vec![]))
    }

    #[test]
    fn test_starts_empty() {
        let store = SnapshotStore::new();
        assert!(store.previous().is_none());
        assert!(!store.has_previous());
    }

    #[test]
    fn test_replace_returns_old() {
        let store = SnapshotStore::new();
        assert!(store.replace(snapshot("BTCUSDT")).is_none());

        let old = store.replace(snapshot("ETHUSDT")).unwrap();
        assert_eq!(old.symbol(), "BTCUSDT");
        assert_eq!(store.previous().unwrap().symbol(), "ETHUSDT");
    }

    #[test]
    fn test_clear() {
        let store = SnapshotStore::new();
        store.replace(snapshot("BTCUSDT"));

        assert!(store.clear().is_some());
        assert!(!store.has_previous());
        assert!(store.clear().is_none());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = SnapshotStore::new();
        store.replace(snapshot("BTCUSDT"));

        let held = store.previous().unwrap();
        store.replace(snapshot("ETHUSDT"));
        assert_eq!(held.symbol(), "BTCUSDT");
    }
}
