use std::fmt;

use serde::{Deserialize, Serialize};

use super::side::BookSide;
use super::snapshot::Snapshot;
use crate::values::{Price, Quantity};

/// Top-of-book statistics computed from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub best_bid: Price,
    pub best_ask: Price,
    pub spread: Price,
    pub mid_price: Price,
    pub total_bid_volume: Quantity,
    pub total_ask_volume: Quantity,
}

impl BookSummary {
    /// Returns `None` when either side of the book is empty or a statistic
    /// overflows the decimal range
    pub fn from_snapshot(snapshot: &Snapshot) -> Option<Self> {
        let best_bid = snapshot.best_bid()?.price;
        let best_ask = snapshot.best_ask()?.price;

        Some(Self {
            best_bid,
            best_ask,
            spread: best_ask.checked_sub(best_bid)?,
            mid_price: best_ask.checked_add(best_bid)?.checked_div(Price::TWO)?,
            total_bid_volume: snapshot.total_volume(BookSide::Bid)?,
            total_ask_volume: snapshot.total_volume(BookSide::Ask)?,
        })
    }
}

impl fmt::Display for BookSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Best Bid: {}, Best Ask: {}\nSpread: {}, Mid Price: {}\nTotal Bid Volume: {}, Total Ask Volume: {}",
            self.best_bid,
            self.best_ask,
            self.spread,
            self.mid_price,
            self.total_bid_volume,
            self.total_ask_volume
        )
    }
}
