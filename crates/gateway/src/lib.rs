//! Depthwatch Gateway
//!
//! Adapters between the detection engine and the outside world:
//! - [`RestClient`]: Binance-compatible REST depth source (`MarketDataSource`)
//! - [`TelegramSink`]: chat notifications through the Telegram Bot API
//! - [`LogSink`] / [`FanoutSink`]: log-only delivery and multi-sink delivery
//!
//! ## Architecture
//!
//! ```text
//!  Exchange REST API              Telegram Bot API
//!         │                              ▲
//!    ┌────▼──────┐                ┌──────┴───────┐
//!    │RestClient │                │ TelegramSink │
//!    └────┬──────┘                └──────▲───────┘
//!         │ MarketDataSource             │ NotificationSink
//!    ┌────▼──────────────────────────────┴───────┐
//!    │              Polling scheduler            │
//!    └───────────────────────────────────────────┘
//! ```

pub mod error;
pub mod notify;
pub mod rest;

// Re-export commonly used types
pub use error::RestError;
pub use notify::{FanoutSink, LogSink, TelegramSink};
pub use rest::{RestClient, parse_depth};
