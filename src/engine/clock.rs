//! Submission clock.

use std::time::Instant;

/// Nanoseconds since construction, strictly increasing across calls.
///
/// Two readings never tie, so every order gets a distinct time priority
/// even when submissions land within the timer's resolution.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    last: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last: 0,
        }
    }

    /// Next timestamp. Always greater than the previous one.
    pub fn now(&mut self) -> u64 {
        let elapsed = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.last = elapsed.max(self.last.saturating_add(1));
        self.last
    }

    /// Last value handed out, 0 before the first reading.
    #[inline]
    pub fn last(&self) -> u64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strictly_increasing() {
        let mut clock = MonotonicClock::new();
        let mut previous = clock.now();
        for _ in 0..10_000 {
            let next = clock.now();
            assert!(next > previous);
            previous = next;
        }
        assert_eq!(clock.last(), previous);
    }

    #[test]
    fn test_first_reading_is_non_zero() {
        let mut clock = MonotonicClock::new();
        assert_eq!(clock.last(), 0);
        assert!(clock.now() >= 1);
    }
}
