use serde::{Deserialize, Serialize};

/// Side of the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BookSide {
    Bid,
    Ask,
}

impl BookSide {
    /// Singular label used in cancellation messages ("bid" / "ask")
    pub fn label(&self) -> &'static str {
        match self {
            BookSide::Bid => "bid",
            BookSide::Ask => "ask",
        }
    }

    /// Plural label used in wall messages ("bids" / "asks")
    pub fn plural(&self) -> &'static str {
        match self {
            BookSide::Bid => "bids",
            BookSide::Ask => "asks",
        }
    }
}
