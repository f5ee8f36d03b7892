//! Runtime detection settings
//!
//! Settings are only ever replaced wholesale: an update is applied to a
//! copy, validated, and returned. A rejected update leaves the caller's
//! settings untouched.

use std::time::Duration;

use depthwatch_core::{Price, Quantity, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, DetectorResult};

/// Longest accepted notification cooldown
pub const MAX_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-symbol preset: bucketing and both detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSettings {
    pub bucket_width: Price,
    pub large_wall_threshold: Quantity,
    pub cancellation_threshold: Quantity,
}

impl Default for PairSettings {
    fn default() -> Self {
        Self {
            bucket_width: dec!(150),
            large_wall_threshold: dec!(300),
            cancellation_threshold: dec!(80),
        }
    }
}

impl PairSettings {
    pub fn validate(&self) -> DetectorResult<()> {
        require_positive("bucket_width", self.bucket_width)?;
        require_positive("large_wall_threshold", self.large_wall_threshold)?;
        require_positive("cancellation_threshold", self.cancellation_threshold)?;
        Ok(())
    }
}

/// Settings read by every detection cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bucket_width: Price,
    pub large_wall_threshold: Quantity,
    pub cancellation_threshold: Quantity,
    pub notification_cooldown: Duration,
    pub active_symbol: Symbol,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_pair("BTCUSDT", PairSettings::default(), Duration::from_secs(3600))
    }
}

impl Settings {
    pub fn from_pair(symbol: &str, pair: PairSettings, cooldown: Duration) -> Self {
        Self {
            bucket_width: pair.bucket_width,
            large_wall_threshold: pair.large_wall_threshold,
            cancellation_threshold: pair.cancellation_threshold,
            notification_cooldown: cooldown,
            active_symbol: symbol.to_ascii_uppercase(),
        }
    }

    /// The per-pair part of these settings
    pub fn pair(&self) -> PairSettings {
        PairSettings {
            bucket_width: self.bucket_width,
            large_wall_threshold: self.large_wall_threshold,
            cancellation_threshold: self.cancellation_threshold,
        }
    }

    pub fn validate(&self) -> DetectorResult<()> {
        self.pair().validate()?;
        if self.notification_cooldown > MAX_COOLDOWN {
            return Err(DetectorError::InvalidConfiguration(format!(
                "notification_cooldown must be at most {}s, got {}s",
                MAX_COOLDOWN.as_secs(),
                self.notification_cooldown.as_secs()
            )));
        }
        validate_symbol(&self.active_symbol)?;
        Ok(())
    }

    /// Apply an update to a copy of these settings and validate the result
    pub fn apply(&self, update: &SettingsUpdate) -> DetectorResult<Settings> {
        let mut next = self.clone();

        if let Some(width) = update.bucket_width {
            next.bucket_width = width;
        }
        if let Some(threshold) = update.large_wall_threshold {
            next.large_wall_threshold = threshold;
        }
        if let Some(threshold) = update.cancellation_threshold {
            next.cancellation_threshold = threshold;
        }
        if let Some(cooldown) = update.notification_cooldown {
            next.notification_cooldown = cooldown;
        }
        if let Some(symbol) = &update.active_symbol {
            next.active_symbol = symbol.trim().to_ascii_uppercase();
        }

        next.validate()?;
        Ok(next)
    }

    /// What changed between `self` and `next`
    pub fn change_to(&self, next: &Settings) -> SettingsChange {
        SettingsChange {
            symbol: self.active_symbol != next.active_symbol,
            bucket_width: self.bucket_width != next.bucket_width,
            thresholds: self.large_wall_threshold != next.large_wall_threshold
                || self.cancellation_threshold != next.cancellation_threshold,
            cooldown: self.notification_cooldown != next.notification_cooldown,
        }
    }
}

/// Partial settings change; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub bucket_width: Option<Price>,
    pub large_wall_threshold: Option<Quantity>,
    pub cancellation_threshold: Option<Quantity>,
    pub notification_cooldown: Option<Duration>,
    pub active_symbol: Option<Symbol>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_width(mut self, width: Price) -> Self {
        self.bucket_width = Some(width);
        self
    }

    pub fn large_wall_threshold(mut self, threshold: Quantity) -> Self {
        self.large_wall_threshold = Some(threshold);
        self
    }

    pub fn cancellation_threshold(mut self, threshold: Quantity) -> Self {
        self.cancellation_threshold = Some(threshold);
        self
    }

    pub fn notification_cooldown(mut self, cooldown: Duration) -> Self {
        self.notification_cooldown = Some(cooldown);
        self
    }

    pub fn active_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.active_symbol = Some(symbol.into());
        self
    }

    /// Update that loads a pair preset
    pub fn from_pair(pair: PairSettings) -> Self {
        Self::new()
            .bucket_width(pair.bucket_width)
            .large_wall_threshold(pair.large_wall_threshold)
            .cancellation_threshold(pair.cancellation_threshold)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Which groups of settings an accepted update touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub symbol: bool,
    pub bucket_width: bool,
    pub thresholds: bool,
    pub cooldown: bool,
}

impl SettingsChange {
    /// Whether the stored previous snapshot can no longer be diffed against
    pub fn invalidates_snapshot(&self) -> bool {
        self.symbol || self.bucket_width
    }

    pub fn is_empty(&self) -> bool {
        !(self.symbol || self.bucket_width || self.thresholds || self.cooldown)
    }
}

fn require_positive(field: &str, value: Decimal) -> DetectorResult<()> {
    if value <= Decimal::ZERO {
        return Err(DetectorError::InvalidConfiguration(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_symbol(symbol: &str) -> DetectorResult<()> {
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DetectorError::InvalidConfiguration(format!(
            "symbol must be non-empty ASCII alphanumeric, got '{}'",
            symbol
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.active_symbol, "BTCUSDT");
        assert_eq!(settings.notification_cooldown, Duration::from_secs(3600));
    }

    #[test]
    fn test_apply_partial_update() {
        let settings = Settings::default();
        let next = settings
            .apply(&SettingsUpdate::new().bucket_width(dec!(50)).active_symbol("ethusdt"))
            .unwrap();

        assert_eq!(next.bucket_width, dec!(50));
        assert_eq!(next.active_symbol, "ETHUSDT");
        assert_eq!(next.large_wall_threshold, settings.large_wall_threshold);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let settings = Settings::default();

        for update in [
            SettingsUpdate::new().bucket_width(dec!(0)),
            SettingsUpdate::new().large_wall_threshold(dec!(-1)),
            SettingsUpdate::new().cancellation_threshold(dec!(0)),
        ] {
            let err = settings.apply(&update).unwrap_err();
            assert!(matches!(err, DetectorError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_rejects_bad_cooldown_and_symbol() {
        let settings = Settings::default();

        assert!(settings
            .apply(&SettingsUpdate::new().notification_cooldown(MAX_COOLDOWN + Duration::from_secs(1)))
            .is_err());
        assert!(settings.apply(&SettingsUpdate::new().active_symbol("")).is_err());
        assert!(settings.apply(&SettingsUpdate::new().active_symbol("BTC/USDT")).is_err());
    }

    #[test]
    fn test_zero_cooldown_allowed() {
        let settings = Settings::default();
        let next = settings
            .apply(&SettingsUpdate::new().notification_cooldown(Duration::ZERO))
            .unwrap();
        assert_eq!(next.notification_cooldown, Duration::ZERO);
    }

    #[test]
    fn test_change_detection() {
        let settings = Settings::default();
        let next = settings
            .apply(&SettingsUpdate::new().large_wall_threshold(dec!(999)))
            .unwrap();

        let change = settings.change_to(&next);
        assert!(change.thresholds);
        assert!(!change.invalidates_snapshot());

        let switched = settings.apply(&SettingsUpdate::new().active_symbol("ETHUSDT")).unwrap();
        assert!(settings.change_to(&switched).invalidates_snapshot());
        assert!(settings.change_to(&settings).is_empty());
    }

    #[test]
    fn test_pair_round_trip() {
        let pair = PairSettings {
            bucket_width: dec!(10),
            large_wall_threshold: dec!(2500),
            cancellation_threshold: dec!(500),
        };
        let settings = Settings::default().apply(&SettingsUpdate::from_pair(pair)).unwrap();
        assert_eq!(settings.pair(), pair);
    }
}
