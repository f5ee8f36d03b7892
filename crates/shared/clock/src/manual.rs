use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use depthwatch_core::Timestamp;
use depthwatch_ports::Clock;

/// Fixed clock that only advances when explicitly moved
///
/// Used for deterministic cooldown and eviction tests: no real time has to
/// elapse for a notification cooldown to expire.
pub struct ManualClock {
    current_time: Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a new manual clock
    ///
    /// # Arguments
    /// * `initial_time` - Optional starting time. If None, uses current wall time.
    pub fn new(initial_time: Option<Timestamp>) -> Arc<Self> {
        Arc::new(Self {
            current_time: Mutex::new(initial_time.unwrap_or_else(Utc::now)),
        })
    }

    /// Advance the clock by a specified duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.lock();
        *current += duration;
    }

    /// Explicitly set the time
    pub fn set_time(&self, time: Timestamp) {
        *self.lock() = time;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timestamp> {
        // A poisoned clock still holds a valid timestamp
        self.current_time
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.lock()
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_until_advanced() {
        let clock = ManualClock::new(None);

        let time1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let time2 = clock.now();
        assert_eq!(time1, time2);

        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now() - time1, Duration::seconds(5));
    }

    #[test]
    fn test_set_time() {
        let start = Utc::now();
        let clock = ManualClock::new(Some(start));
        let later = start + Duration::hours(2);

        clock.set_time(later);
        assert_eq!(clock.now(), later);
    }
}
