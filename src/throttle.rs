//! Throttle — a per-operation rate limiter that drops rather than queues.
//!
//! Each named operation fires immediately the first time it is called, and
//! thereafter only if at least `1 / rate_per_sec` has elapsed since its
//! last fire. A call inside that window is dropped, not delayed or
//! buffered — the caller decides what to do with a drop (for
//! order-lifecycle commands, the dispatcher surfaces it as
//! [`crate::error::KrakenError::ThrottleDrop`]).

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks the last-fire time of each named operation.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_fired: HashMap<String, Instant>,
}

impl Throttle {
    /// `rate_per_sec` is the maximum number of times any single operation
    /// name may fire per second.
    pub fn new(rate_per_sec: f64) -> Self {
        Self {
            min_interval: Duration::from_secs_f64(1.0 / rate_per_sec),
            last_fired: HashMap::new(),
        }
    }

    /// Returns `true` if `op` may fire now, recording the fire time as a
    /// side effect. Returns `false` (and does *not* update the last-fire
    /// time) if `op` fired too recently.
    pub fn allow(&mut self, op: &str) -> bool {
        let now = Instant::now();
        match self.last_fired.get(op) {
            Some(&last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_fired.insert(op.to_owned(), now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn first_call_always_allowed() {
        let mut throttle = Throttle::new(1.0);
        assert!(throttle.allow("addOrder"));
    }

    #[test]
    fn immediate_repeat_is_dropped() {
        let mut throttle = Throttle::new(1.0);
        assert!(throttle.allow("addOrder"));
        assert!(!throttle.allow("addOrder"));
    }

    #[test]
    fn distinct_operations_have_independent_budgets() {
        let mut throttle = Throttle::new(1.0);
        assert!(throttle.allow("addOrder"));
        assert!(throttle.allow("cancelOrder"));
    }

    #[test]
    fn allowed_again_after_interval_elapses() {
        let mut throttle = Throttle::new(100.0);
        assert!(throttle.allow("ping"));
        sleep(Duration::from_millis(15));
        assert!(throttle.allow("ping"));
    }
}
