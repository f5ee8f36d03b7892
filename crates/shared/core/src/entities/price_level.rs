use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity};

/// A single aggregated order-book level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub amount: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price, amount: Quantity) -> Self {
        Self { price, amount }
    }
}

impl From<(Price, Quantity)> for PriceLevel {
    fn from((price, amount): (Price, Quantity)) -> Self {
        Self { price, amount }
    }
}
