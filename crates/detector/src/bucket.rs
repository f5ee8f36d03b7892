//! Bucketizer
//!
//! Groups raw price levels into fixed-width price buckets. The bucket of a
//! price is `round(price / width) * width` with ties rounded to even, and
//! the amounts of every raw level landing in the same bucket are summed
//! exactly.
//!
//! The bucketizer is side-agnostic: it always emits ascending prices and
//! the snapshot orders each side best-first.

use std::collections::BTreeMap;

use depthwatch_core::{Price, PriceLevel, Quantity, Snapshot};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DetectorError, DetectorResult};

/// Group raw `(price, amount)` pairs into buckets of `width`
///
/// Returns levels sorted ascending by bucket price, one per bucket.
pub fn bucket(raw_levels: &[(Price, Quantity)], width: Price) -> DetectorResult<Vec<PriceLevel>> {
    if width <= Decimal::ZERO {
        return Err(DetectorError::InvalidConfiguration(format!(
            "bucket width must be positive, got {}",
            width
        )));
    }

    let mut grouped: BTreeMap<Price, Quantity> = BTreeMap::new();

    for &(price, amount) in raw_levels {
        let bucket_price = bucket_price(price, width)?;
        let total = grouped.entry(bucket_price).or_insert(Decimal::ZERO);
        *total = total.checked_add(amount).ok_or_else(|| {
            DetectorError::Overflow(format!("volume in bucket {} exceeds range", bucket_price))
        })?;
    }

    Ok(grouped
        .into_iter()
        .map(|(price, amount)| PriceLevel::new(price, amount))
        .collect())
}

/// Bucket both sides of a decoded book into an immutable snapshot
pub fn build_snapshot(
    symbol: &str,
    width: Price,
    bids: &[(Price, Quantity)],
    asks: &[(Price, Quantity)],
) -> DetectorResult<Snapshot> {
    let bids = bucket(bids, width)?;
    let asks = bucket(asks, width)?;
    Ok(Snapshot::new(symbol, width, bids, asks))
}

fn bucket_price(price: Price, width: Price) -> DetectorResult<Price> {
    let overflow = || {
        DetectorError::Overflow(format!(
            "price {} cannot be bucketed at width {}",
            price, width
        ))
    };

    let steps = price
        .checked_div(width)
        .ok_or_else(overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);

    // Normalized so that 100 and 100.0 land on the same key
    Ok(steps.checked_mul(width).ok_or_else(overflow)?.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn total(levels: &[(Price, Quantity)]) -> Quantity {
        levels.iter().map(|(_, amount)| *amount).sum()
    }

    #[test]
    fn test_empty_input() {
        assert!(bucket(&[], dec!(10)).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_positive_width() {
        let raw = [(dec!(100), dec!(1))];
        assert!(matches!(
            bucket(&raw, dec!(0)),
            Err(DetectorError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            bucket(&raw, dec!(-5)),
            Err(DetectorError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_groups_nearby_levels() {
        let raw = [(dec!(100.02), dec!(10)), (dec!(100.04), dec!(5))];
        let bucketed = bucket(&raw, dec!(10)).unwrap();
        assert_eq!(bucketed, vec![PriceLevel::new(dec!(100), dec!(15))]);
    }

    #[test]
    fn test_output_sorted_ascending() {
        let raw = [
            (dec!(130), dec!(1)),
            (dec!(101), dec!(2)),
            (dec!(118), dec!(3)),
            (dec!(99), dec!(4)),
        ];
        let bucketed = bucket(&raw, dec!(10)).unwrap();
        let prices: Vec<_> = bucketed.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![dec!(100), dec!(120), dec!(130)]);
        assert_eq!(bucketed[0].amount, dec!(6));
    }

    #[test]
    fn test_ties_round_to_even() {
        // 105 / 10 = 10.5 -> 10, 115 / 10 = 11.5 -> 12
        let raw = [(dec!(105), dec!(1)), (dec!(115), dec!(1))];
        let bucketed = bucket(&raw, dec!(10)).unwrap();
        assert_eq!(bucketed[0].price, dec!(100));
        assert_eq!(bucketed[1].price, dec!(120));
    }

    #[test]
    fn test_fractional_width() {
        let raw = [(dec!(0.5234), dec!(1)), (dec!(0.5261), dec!(2))];
        let bucketed = bucket(&raw, dec!(0.01)).unwrap();
        assert_eq!(bucketed[0].price, dec!(0.52));
        assert_eq!(bucketed[1].price, dec!(0.53));
    }

    #[test]
    fn test_volume_conserved() {
        let raw = [
            (dec!(50012.31), dec!(0.00120000)),
            (dec!(50013.99), dec!(1.5)),
            (dec!(50101.10), dec!(13.37)),
            (dec!(49875.00), dec!(0.000001)),
            (dec!(51000.55), dec!(250)),
        ];

        for width in [dec!(0.5), dec!(1), dec!(10), dec!(100), dec!(1000)] {
            let bucketed = bucket(&raw, width).unwrap();
            let bucketed_total: Quantity = bucketed.iter().map(|l| l.amount).sum();
            assert_eq!(bucketed_total, total(&raw), "width {}", width);
        }
    }

    #[test]
    fn test_bucketing_is_idempotent() {
        let raw = [
            (dec!(100.02), dec!(10)),
            (dec!(100.04), dec!(5)),
            (dec!(154.90), dec!(3)),
            (dec!(205), dec!(7)),
        ];
        let once = bucket(&raw, dec!(10)).unwrap();
        let as_raw: Vec<_> = once.iter().map(|l| (l.price, l.amount)).collect();
        let twice = bucket(&as_raw, dec!(10)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_exact_accumulation_at_large_volume() {
        // Values that drift under binary floating point
        let raw = vec![(dec!(100), dec!(0.1)); 1000];
        let bucketed = bucket(&raw, dec!(10)).unwrap();
        assert_eq!(bucketed[0].amount, dec!(100));
    }

    #[test]
    fn test_build_snapshot_orders_sides() {
        let bids = [(dec!(99.6), dec!(1)), (dec!(101), dec!(2))];
        let asks = [(dec!(103), dec!(3)), (dec!(112), dec!(4))];
        let snapshot = build_snapshot("BTCUSDT", dec!(10), &bids, &asks).unwrap();

        assert_eq!(snapshot.symbol(), "BTCUSDT");
        assert_eq!(snapshot.bucket_width(), dec!(10));
        // Both bids land in the 100 bucket
        assert_eq!(snapshot.bids(), &[PriceLevel::new(dec!(100), dec!(3))]);
        assert_eq!(snapshot.asks()[0].price, dec!(100));
        assert_eq!(snapshot.asks()[1].price, dec!(110));
    }
}
