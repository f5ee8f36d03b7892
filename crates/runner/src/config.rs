//! Startup configuration
//!
//! Loaded from an optional JSON file; every field has a default so an empty
//! object (or no file at all) is a valid configuration. Telegram credentials
//! can come from the environment instead of the file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use depthwatch_clock::UniformJitter;
use depthwatch_core::Symbol;
use depthwatch_detector::{MAX_COOLDOWN, PairSettings, Settings};
use depthwatch_gateway::rest::DEFAULT_BASE_URL;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::Presets;

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Telegram bot credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

/// Root configuration for the monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Exchange REST root
    pub base_url: String,
    /// Levels requested per side
    pub depth_limit: u32,
    pub request_timeout_secs: u64,
    /// Symbol polled at startup
    pub symbol: Symbol,
    pub notification_cooldown_secs: u64,
    pub poll_delay_min_ms: u64,
    pub poll_delay_max_ms: u64,
    /// Pair settings for symbols without a preset
    pub defaults: PairSettings,
    /// Per-symbol presets
    pub pairs: HashMap<Symbol, PairSettings>,
    pub telegram: Option<TelegramConfig>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            depth_limit: 5000,
            request_timeout_secs: 10,
            symbol: "BTCUSDT".to_string(),
            notification_cooldown_secs: 3600,
            poll_delay_min_ms: 2000,
            poll_delay_max_ms: 3000,
            defaults: PairSettings::default(),
            pairs: default_pairs(),
            telegram: None,
        }
    }
}

fn default_pairs() -> HashMap<Symbol, PairSettings> {
    HashMap::from([
        (
            "BTCUSDT".to_string(),
            PairSettings {
                bucket_width: dec!(100),
                large_wall_threshold: dec!(150),
                cancellation_threshold: dec!(80),
            },
        ),
        (
            "ETHUSDT".to_string(),
            PairSettings {
                bucket_width: dec!(10),
                large_wall_threshold: dec!(2500),
                cancellation_threshold: dec!(500),
            },
        ),
    ])
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `TELEGRAM_TOKEN` / `TELEGRAM_CHAT_ID` from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// Each variable replaces its file value; a token without a chat id
    /// (or the reverse) only takes effect if the file supplies the other.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let token = lookup(TELEGRAM_TOKEN_VAR).filter(|v| !v.is_empty());
        let chat_id = lookup(TELEGRAM_CHAT_ID_VAR).filter(|v| !v.is_empty());

        let current = self.telegram.take();
        let token = token.or_else(|| current.as_ref().map(|t| t.token.clone()));
        let chat_id = chat_id.or_else(|| current.as_ref().map(|t| t.chat_id.clone()));

        self.telegram = match (token, chat_id) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig { token, chat_id }),
            _ => None,
        };
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth_limit == 0 {
            return Err(ConfigError::Invalid("depth_limit must be positive".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.poll_delay_min_ms > self.poll_delay_max_ms {
            return Err(ConfigError::Invalid(format!(
                "poll delay range is reversed: {}ms > {}ms",
                self.poll_delay_min_ms, self.poll_delay_max_ms
            )));
        }
        if self.notification_cooldown() > MAX_COOLDOWN {
            return Err(ConfigError::Invalid(format!(
                "notification_cooldown_secs must be at most {}",
                MAX_COOLDOWN.as_secs()
            )));
        }

        self.defaults
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("defaults: {}", e)))?;
        for (symbol, pair) in &self.pairs {
            pair.validate()
                .map_err(|e| ConfigError::Invalid(format!("pairs.{}: {}", symbol, e)))?;
        }

        self.initial_settings().map(|_| ())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_cooldown(&self) -> Duration {
        Duration::from_secs(self.notification_cooldown_secs)
    }

    pub fn jitter(&self) -> UniformJitter {
        UniformJitter::from_millis(self.poll_delay_min_ms, self.poll_delay_max_ms)
    }

    pub fn presets(&self) -> Presets {
        self.pairs
            .iter()
            .fold(Presets::new(self.defaults), |presets, (symbol, pair)| {
                presets.with_pair(symbol, *pair)
            })
    }

    /// Settings for the startup symbol, from its preset when it has one
    pub fn initial_settings(&self) -> Result<Settings, ConfigError> {
        let pair = self.presets().for_symbol(&self.symbol);
        let settings = Settings::from_pair(self.symbol.trim(), pair, self.notification_cooldown());
        settings
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = RunnerConfig::from_json("{}").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_initial_settings_use_preset() {
        let config = RunnerConfig::default();
        let settings = config.initial_settings().unwrap();
        assert_eq!(settings.active_symbol, "BTCUSDT");
        assert_eq!(settings.bucket_width, dec!(100));
        assert_eq!(settings.large_wall_threshold, dec!(150));
        assert_eq!(settings.notification_cooldown, Duration::from_secs(3600));

        let config = RunnerConfig {
            symbol: "xrpusdt".to_string(),
            ..RunnerConfig::default()
        };
        let settings = config.initial_settings().unwrap();
        assert_eq!(settings.active_symbol, "XRPUSDT");
        assert_eq!(settings.pair(), PairSettings::default());
    }

    #[test]
    fn test_parse_file_shape() {
        let json = r#"{
            "symbol": "ETHUSDT",
            "depth_limit": 1000,
            "poll_delay_min_ms": 500,
            "poll_delay_max_ms": 900,
            "defaults": {
                "bucket_width": "50",
                "large_wall_threshold": "200",
                "cancellation_threshold": "40"
            },
            "pairs": {
                "SOLUSDT": {
                    "bucket_width": "0.5",
                    "large_wall_threshold": "20000",
                    "cancellation_threshold": "5000"
                }
            },
            "telegram": { "token": "123:abc", "chat_id": "-1001" }
        }"#;

        let config = RunnerConfig::from_json(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.depth_limit, 1000);
        assert_eq!(config.jitter().min(), Duration::from_millis(500));
        assert_eq!(config.pairs.len(), 1);
        assert_eq!(config.presets().for_symbol("SOLUSDT").bucket_width, dec!(0.5));
        // ETHUSDT has no preset in this file
        assert_eq!(config.initial_settings().unwrap().bucket_width, dec!(50));
        assert_eq!(
            config.telegram,
            Some(TelegramConfig {
                token: "123:abc".to_string(),
                chat_id: "-1001".to_string()
            })
        );
    }

    #[test]
    fn test_parse_error() {
        let err = RunnerConfig::from_json(r#"{"depth_limit": "lots"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_failures() {
        let reversed = RunnerConfig {
            poll_delay_min_ms: 3000,
            poll_delay_max_ms: 2000,
            ..RunnerConfig::default()
        };
        assert!(matches!(reversed.validate(), Err(ConfigError::Invalid(_))));

        let zero_depth = RunnerConfig {
            depth_limit: 0,
            ..RunnerConfig::default()
        };
        assert!(zero_depth.validate().is_err());

        let mut bad_pair = RunnerConfig::default();
        bad_pair.pairs.insert(
            "ETHUSDT".to_string(),
            PairSettings {
                bucket_width: dec!(0),
                ..PairSettings::default()
            },
        );
        let err = bad_pair.validate().unwrap_err();
        assert!(err.to_string().contains("pairs.ETHUSDT"));

        let bad_symbol = RunnerConfig {
            symbol: "BTC-USDT".to_string(),
            ..RunnerConfig::default()
        };
        assert!(bad_symbol.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = RunnerConfig::default().with_overrides(|key| match key {
            TELEGRAM_TOKEN_VAR => Some("env-token".to_string()),
            TELEGRAM_CHAT_ID_VAR => Some("42".to_string()),
            _ => None,
        });
        assert_eq!(
            config.telegram,
            Some(TelegramConfig {
                token: "env-token".to_string(),
                chat_id: "42".to_string()
            })
        );

        // Token alone is not enough
        let config = RunnerConfig::default().with_overrides(|key| {
            (key == TELEGRAM_TOKEN_VAR).then(|| "env-token".to_string())
        });
        assert_eq!(config.telegram, None);

        // Env chat id on top of file token
        let config = RunnerConfig {
            telegram: Some(TelegramConfig {
                token: "file-token".to_string(),
                chat_id: "1".to_string(),
            }),
            ..RunnerConfig::default()
        }
        .with_overrides(|key| (key == TELEGRAM_CHAT_ID_VAR).then(|| "2".to_string()));
        assert_eq!(
            config.telegram,
            Some(TelegramConfig {
                token: "file-token".to_string(),
                chat_id: "2".to_string()
            })
        );
    }
}
