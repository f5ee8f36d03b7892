//! Notification sinks
//!
//! - `telegram`: Telegram Bot API delivery
//! - `log`: delivery into the process log, and fan-out to several sinks

mod log_sink;
mod telegram;

pub use log_sink::{FanoutSink, LogSink};
pub use telegram::{TELEGRAM_API_URL, TelegramSink};
