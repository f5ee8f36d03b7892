use std::time::Duration;

use depthwatch_ports::Jitter;
use rand::Rng;

/// Delay drawn uniformly from `[min, max]` on every call
#[derive(Debug, Clone, Copy)]
pub struct UniformJitter {
    min: Duration,
    max: Duration,
}

impl UniformJitter {
    /// Bounds are swapped if given in the wrong order
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for UniformJitter {
    /// 2 to 3 seconds between polls
    fn default() -> Self {
        Self::from_millis(2000, 3000)
    }
}

impl Jitter for UniformJitter {
    fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// Constant delay, for tests and replay
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

impl Jitter for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_jitter_within_bounds() {
        let jitter = UniformJitter::default();
        for _ in 0..200 {
            let delay = jitter.next_delay();
            assert!(delay >= Duration::from_secs(2));
            assert!(delay <= Duration::from_secs(3));
        }
    }

    #[test]
    fn test_uniform_jitter_swaps_bounds() {
        let jitter = UniformJitter::from_millis(300, 100);
        assert_eq!(jitter.min(), Duration::from_millis(100));
        assert_eq!(jitter.max(), Duration::from_millis(300));
    }

    #[test]
    fn test_degenerate_range() {
        let jitter = UniformJitter::from_millis(50, 50);
        assert_eq!(jitter.next_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_fixed_delay() {
        assert_eq!(FixedDelay::from_millis(7).next_delay(), Duration::from_millis(7));
    }
}
