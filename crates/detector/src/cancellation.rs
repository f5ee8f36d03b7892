//! Cancellation ("spoofing") Detection
//!
//! Diffs two consecutive snapshots of the same side. Levels are outer-joined
//! on bucketed price; a price missing from one side of the join counts as
//! zero amount there. Every price whose amount dropped by more than the
//! threshold is reported, every cycle it qualifies. There is no cooldown.

use std::collections::BTreeMap;

use depthwatch_core::{Alert, BookSide, Price, PriceLevel, Quantity, Snapshot};
use rust_decimal::Decimal;

/// Cancellation detector for one cycle's threshold
#[derive(Debug, Clone, Copy)]
pub struct CancellationDetector {
    threshold: Quantity,
}

impl CancellationDetector {
    pub fn new(threshold: Quantity) -> Self {
        Self { threshold }
    }

    /// Compare one side of two snapshots
    ///
    /// Alerts come out in ascending price order.
    pub fn detect(
        &self,
        previous: &[PriceLevel],
        current: &[PriceLevel],
        side: BookSide,
    ) -> Vec<Alert> {
        let mut joined: BTreeMap<Price, (Quantity, Quantity)> = BTreeMap::new();

        for level in previous {
            let amounts = joined.entry(level.price).or_insert((Decimal::ZERO, Decimal::ZERO));
            amounts.0 = amounts.0.saturating_add(level.amount);
        }
        for level in current {
            let amounts = joined.entry(level.price).or_insert((Decimal::ZERO, Decimal::ZERO));
            amounts.1 = amounts.1.saturating_add(level.amount);
        }

        joined
            .into_iter()
            .filter_map(|(price, (previous_amount, current_amount))| {
                let cancelled_amount = previous_amount.saturating_sub(current_amount);
                (cancelled_amount > self.threshold).then_some(Alert::Cancellation {
                    side,
                    price,
                    cancelled_amount,
                })
            })
            .collect()
    }

    /// Run on both sides, bids first
    ///
    /// The caller is responsible for only diffing comparable snapshots
    /// (same symbol and bucket width).
    pub fn detect_snapshots(&self, previous: &Snapshot, current: &Snapshot) -> Vec<Alert> {
        let mut alerts = self.detect(previous.bids(), current.bids(), BookSide::Bid);
        alerts.extend(self.detect(previous.asks(), current.asks(), BookSide::Ask));
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: Price, amount: Quantity) -> PriceLevel {
        PriceLevel::new(price, amount)
    }

    fn cancelled(alert: &Alert) -> Quantity {
        match alert {
            Alert::Cancellation {
                cancelled_amount, ..
            } => *cancelled_amount,
            Alert::Wall { .. } => panic!("Expected cancellation"),
        }
    }

    #[test]
    fn test_drop_above_threshold() {
        let detector = CancellationDetector::new(dec!(20));
        let alerts = detector.detect(
            &[level(dec!(100), dec!(50))],
            &[level(dec!(100), dec!(10))],
            BookSide::Bid,
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].price(), dec!(100));
        assert_eq!(alerts[0].side(), BookSide::Bid);
        assert_eq!(cancelled(&alerts[0]), dec!(40));
    }

    #[test]
    fn test_level_vanished() {
        let detector = CancellationDetector::new(dec!(20));
        let alerts = detector.detect(&[level(dec!(100), dec!(50))], &[], BookSide::Ask);

        assert_eq!(alerts.len(), 1);
        assert_eq!(cancelled(&alerts[0]), dec!(50));
    }

    #[test]
    fn test_drop_at_threshold_not_flagged() {
        let detector = CancellationDetector::new(dec!(20));
        let alerts = detector.detect(
            &[level(dec!(100), dec!(50))],
            &[level(dec!(100), dec!(30))],
            BookSide::Bid,
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_increase_and_new_levels_not_flagged() {
        let detector = CancellationDetector::new(dec!(20));
        let alerts = detector.detect(
            &[level(dec!(100), dec!(50))],
            &[level(dec!(100), dec!(500)), level(dec!(110), dec!(900))],
            BookSide::Bid,
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_all_qualifying_levels_reported() {
        let detector = CancellationDetector::new(dec!(5));
        let previous = [
            level(dec!(130), dec!(40)),
            level(dec!(120), dec!(8)),
            level(dec!(110), dec!(30)),
            level(dec!(100), dec!(25)),
        ];
        let current = [level(dec!(120), dec!(1)), level(dec!(100), dec!(24))];

        let alerts = detector.detect(&previous, &current, BookSide::Bid);
        let flagged: Vec<_> = alerts.iter().map(|a| (a.price(), cancelled(a))).collect();
        assert_eq!(
            flagged,
            vec![
                (dec!(110), dec!(30)),
                (dec!(120), dec!(7)),
                (dec!(130), dec!(40)),
            ]
        );
    }

    #[test]
    fn test_no_dedup_across_calls() {
        let detector = CancellationDetector::new(dec!(5));
        let previous = [level(dec!(100), dec!(50))];
        let current = [level(dec!(100), dec!(10))];

        assert_eq!(detector.detect(&previous, &current, BookSide::Ask).len(), 1);
        assert_eq!(detector.detect(&previous, &current, BookSide::Ask).len(), 1);
    }

    #[test]
    fn test_detect_snapshots_covers_both_sides() {
        let previous = Snapshot::new(
            "BTCUSDT",
            dec!(10),
            vec![level(dec!(100), dec!(15))],
            vec![level(dec!(110), dec!(20))],
        );
        let current = Snapshot::new(
            "BTCUSDT",
            dec!(10),
            vec![level(dec!(100), dec!(2))],
            vec![],
        );

        let alerts = CancellationDetector::new(dec!(5)).detect_snapshots(&previous, &current);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].side(), BookSide::Bid);
        assert_eq!(cancelled(&alerts[0]), dec!(13));
        assert_eq!(alerts[1].side(), BookSide::Ask);
        assert_eq!(cancelled(&alerts[1]), dec!(20));
    }
}
