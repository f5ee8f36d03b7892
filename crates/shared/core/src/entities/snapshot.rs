use serde::{Deserialize, Serialize};

use super::price_level::PriceLevel;
use super::side::BookSide;
use crate::values::{Price, Quantity, Symbol};

/// Raw order-book payload as delivered by the market data source
///
/// Levels stay as the exchange's decimal strings; decoding into
/// [`PriceLevel`]s happens at the port boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub bids: Vec<(String, String)>,
    pub asks: Vec<(String, String)>,
}

impl RawSnapshot {
    pub fn new(bids: Vec<(String, String)>, asks: Vec<(String, String)>) -> Self {
        Self { bids, asks }
    }
}

/// One point-in-time aggregated view of a symbol's book
///
/// Bids are held best-first (descending price), asks best-first (ascending
/// price). A snapshot is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    symbol: Symbol,
    bucket_width: Price,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl Snapshot {
    /// Build a snapshot from bucketed levels in any order
    pub fn new(
        symbol: impl Into<Symbol>,
        bucket_width: Price,
        mut bids: Vec<PriceLevel>,
        mut asks: Vec<PriceLevel>,
    ) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));

        Self {
            symbol: symbol.into(),
            bucket_width,
            bids,
            asks,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bucket_width(&self) -> Price {
        self.bucket_width
    }

    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Levels of one side in natural (best-first) order
    pub fn side(&self, side: BookSide) -> &[PriceLevel] {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Sum of resting amount on one side, `None` if it overflows
    pub fn total_volume(&self, side: BookSide) -> Option<Quantity> {
        self.side(side)
            .iter()
            .try_fold(Quantity::ZERO, |total, level| total.checked_add(level.amount))
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Whether two snapshots were produced for the same symbol and bucketing,
    /// i.e. whether diffing them is meaningful
    pub fn is_comparable(&self, other: &Snapshot) -> bool {
        self.symbol == other.symbol && self.bucket_width == other.bucket_width
    }
}
