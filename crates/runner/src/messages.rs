//! Human-readable notification text
//!
//! These strings are what ends up in the chat, so their shape is fixed:
//! two decimals for prices and wall sizes, four for cancelled amounts and
//! summary depth.

use depthwatch_core::{Alert, BookSide, BookSummary, Price, Snapshot, format_fixed};

/// Levels listed per side in the full-state summary
pub const SUMMARY_DEPTH: usize = 5;

pub const NO_DATA: &str = "No order book data available.";
pub const STOPPED_NOTICE: &str = "Order book updates stopped.";
pub const RESUMED_NOTICE: &str = "Order book updates resumed.";

/// Quote assets stripped from a symbol to name its base asset
const QUOTE_ASSETS: [&str; 7] = ["USDT", "USDC", "BUSD", "FDUSD", "USD", "BTC", "ETH"];

pub fn alert_message(alert: &Alert) -> String {
    match *alert {
        Alert::Wall {
            side,
            price,
            amount,
        } => format!(
            "Large {} wall detected: {} coins at ${}",
            side.plural(),
            format_fixed(amount, 2),
            format_fixed(price, 2)
        ),
        Alert::Cancellation {
            side,
            price,
            cancelled_amount,
        } => {
            let square = match side {
                BookSide::Bid => "🟩",
                BookSide::Ask => "🟥",
            };
            format!(
                "{} Large {} spoofing detected: {} coins at ${}",
                square,
                side.label(),
                format_fixed(cancelled_amount, 4),
                price.normalize()
            )
        }
    }
}

/// Full-state summary: mid price and the top levels of each side
pub fn state_message(snapshot: &Snapshot) -> String {
    let Some(summary) = BookSummary::from_snapshot(snapshot) else {
        return NO_DATA.to_string();
    };
    let base = base_asset(snapshot.symbol());

    let mut lines = vec![
        format!("Current Price: ${}", format_fixed(summary.mid_price, 2)),
        String::new(),
        "Top 5 Bids:".to_string(),
    ];
    lines.extend(depth_lines(snapshot, BookSide::Bid, base));
    lines.push(String::new());
    lines.push("Top 5 Asks:".to_string());
    lines.extend(depth_lines(snapshot, BookSide::Ask, base));

    lines.join("\n")
}

fn depth_lines<'a>(
    snapshot: &'a Snapshot,
    side: BookSide,
    base: &'a str,
) -> impl Iterator<Item = String> + 'a {
    snapshot
        .side(side)
        .iter()
        .take(SUMMARY_DEPTH)
        .map(move |level| {
            format!(
                "${}: {} {}",
                format_fixed(level.price, 2),
                format_fixed(level.amount, 4),
                base
            )
        })
}

pub fn switching_notice(symbol: &str) -> String {
    format!("Switching to {} order book.", symbol)
}

pub fn group_interval_notice(width: Price) -> String {
    format!("Group interval set to {}", width.normalize())
}

/// Base asset of an exchange symbol, `BTCUSDT` -> `BTC`
///
/// Falls back to the whole symbol when no known quote suffix matches.
pub fn base_asset(symbol: &str) -> &str {
    QUOTE_ASSETS
        .iter()
        .find_map(|quote| {
            symbol
                .strip_suffix(quote)
                .filter(|base| !base.is_empty())
        })
        .unwrap_or(symbol)
}
