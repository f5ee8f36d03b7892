use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Resting amount at a price level - uses Decimal so that summing and
/// differencing large aggregate volumes stays exact
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Exchange symbol, e.g. `BTCUSDT`
pub type Symbol = String;

/// Render a decimal with exactly `dp` fractional digits
///
/// Rounds half to even first, then pads with zeros when the value carries
/// fewer digits (`100` -> `100.00`).
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, value.round_dp(dp))
}
