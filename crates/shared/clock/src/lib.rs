//! Depthwatch Clock Infrastructure
//!
//! Provides time abstractions for production and tests:
//!
//! - [`SystemClock`]: wall-clock time
//! - [`ManualClock`]: frozen time that only moves when advanced
//! - [`UniformJitter`] / [`FixedDelay`]: inter-poll delay sources
//!
//! ## Usage
//!
//! ```ignore
//! use depthwatch_clock::{ManualClock, FixedDelay};
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(None);
//! clock.advance(Duration::minutes(30)); // Jump forward
//! let jitter = FixedDelay::from_millis(10);
//! ```

mod jitter;
mod manual;
mod system;

pub use jitter::{FixedDelay, UniformJitter};
pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the ports for convenience
pub use depthwatch_ports::{Clock, Jitter};
