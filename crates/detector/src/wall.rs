//! Large Wall Detection
//!
//! Flags the first aggregated level (best price first) whose resting amount
//! exceeds the threshold. At most one wall is reported per side per call.
//!
//! A level that was already notified is suppressed while both hold:
//! - it was notified less than `cooldown` ago
//! - its amount moved less than 10% relative to the notified amount
//!
//! Suppressed levels are skipped and the scan continues, so a different
//! qualifying level further from the touch can still be reported.

use std::time::Duration;

use depthwatch_core::{Alert, BookSide, PriceLevel, Quantity, Snapshot, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::memory::{WallMemory, WallRecord, price_key};

/// Relative amount change below which a repeat wall stays suppressed
const SIGNIFICANT_CHANGE: Decimal = dec!(0.10);

/// Wall detector for one cycle's thresholds
#[derive(Debug, Clone, Copy)]
pub struct WallDetector {
    threshold: Quantity,
    cooldown: Duration,
}

impl WallDetector {
    pub fn new(threshold: Quantity, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
        }
    }

    /// Scan one side, best price first
    ///
    /// `levels` must already be in the side's natural order. Records the
    /// reported wall into `memory`.
    pub fn detect(
        &self,
        levels: &[PriceLevel],
        side: BookSide,
        memory: &mut WallMemory,
        now: Timestamp,
    ) -> Option<Alert> {
        for level in levels {
            if level.amount <= self.threshold {
                continue;
            }

            let key = price_key(level.price);
            if let Some(record) = memory.get(side, &key)
                && self.is_suppressed(record, level.amount, now)
            {
                log::debug!(
                    "Suppressed repeat {} wall at {} ({} coins)",
                    side.label(),
                    key,
                    level.amount
                );
                continue;
            }

            memory.record(side, key, now, level.amount);
            return Some(Alert::Wall {
                side,
                price: level.price,
                amount: level.amount,
            });
        }

        None
    }

    /// Run on both sides of a snapshot, bids first
    pub fn detect_snapshot(
        &self,
        snapshot: &Snapshot,
        memory: &mut WallMemory,
        now: Timestamp,
    ) -> Vec<Alert> {
        [BookSide::Bid, BookSide::Ask]
            .into_iter()
            .filter_map(|side| self.detect(snapshot.side(side), side, memory, now))
            .collect()
    }

    fn is_suppressed(&self, record: &WallRecord, amount: Quantity, now: Timestamp) -> bool {
        let within_cooldown = match (now - record.last_notified_at).to_std() {
            Ok(elapsed) => elapsed < self.cooldown,
            // Clock stepped back behind the last notification
            Err(_) => true,
        };

        within_cooldown && !changed_significantly(record.last_amount, amount)
    }
}

/// Whether `amount` moved at least 10% away from `last_amount`
///
/// A zero reference amount has no defined relative change and always
/// counts as significant.
fn changed_significantly(last_amount: Quantity, amount: Quantity) -> bool {
    if last_amount.is_zero() {
        return true;
    }

    let relative = amount
        .checked_sub(last_amount)
        .and_then(|diff| diff.abs().checked_div(last_amount));
    match relative {
        Some(relative) => relative >= SIGNIFICANT_CHANGE,
        None => true,
    }
}
