use std::time::Duration;

use depthwatch_core::Timestamp;

/// Port for time abstraction
///
/// This allows the system to use different time sources:
/// - Real system time for production
/// - Fixed time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}

/// Port for the delay inserted between two polling cycles
///
/// Production draws a random delay so consecutive polls never fall into
/// lockstep with the exchange's rate-limit windows; tests use a fixed one.
pub trait Jitter: Send + Sync {
    fn next_delay(&self) -> Duration;
}
