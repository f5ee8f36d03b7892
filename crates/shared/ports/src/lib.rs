//! Depthwatch Ports
//!
//! Port definitions (traits) for the depthwatch order-book monitor.
//! These define the boundaries between the detection engine and the
//! outside world: the exchange it polls, the chat it notifies, and the
//! time source it runs on.

mod clock;
mod error;
mod market_data;
mod notification;

pub use clock::{Clock, Jitter};
pub use error::{DeliveryError, FetchError};
pub use market_data::{MarketDataSource, decode_levels};
pub use notification::NotificationSink;
