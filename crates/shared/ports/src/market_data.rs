use std::str::FromStr;

use async_trait::async_trait;
use depthwatch_core::{Price, Quantity, RawSnapshot};
use rust_decimal::Decimal;

use crate::error::FetchError;

/// Port for fetching raw order-book snapshots
///
/// Implementations must reject payloads missing either side with
/// [`FetchError::MalformedPayload`].
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch(&self, symbol: &str, depth_limit: u32) -> Result<RawSnapshot, FetchError>;
}

/// Decode one side of a raw snapshot into exact decimal pairs
///
/// Prices must be strictly positive and amounts non-negative.
pub fn decode_levels(levels: &[(String, String)]) -> Result<Vec<(Price, Quantity)>, FetchError> {
    levels
        .iter()
        .map(|(price, amount)| {
            let price = parse_decimal(price, "price")?;
            let amount = parse_decimal(amount, "amount")?;

            if price <= Decimal::ZERO {
                return Err(FetchError::MalformedPayload(format!(
                    "non-positive price {}",
                    price
                )));
            }
            if amount < Decimal::ZERO {
                return Err(FetchError::MalformedPayload(format!(
                    "negative amount {} at price {}",
                    amount, price
                )));
            }

            Ok((price, amount))
        })
        .collect()
}

fn parse_decimal(value: &str, field: &str) -> Result<Decimal, FetchError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| FetchError::MalformedPayload(format!("invalid {} '{}': {}", field, value, e)))
}
