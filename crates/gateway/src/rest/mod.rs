//! REST market data adapter
//!
//! - `client`: HTTP communication with the exchange
//! - `depth`: depth payload parsing and validation

mod client;
mod depth;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, RestClient};
pub use depth::parse_depth;
