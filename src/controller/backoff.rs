//! # Backoff
//!
//! Exponential backoff for objects whose reconcile keeps failing.
//!
//! Each object key keeps its own failure count, so one broken object does not
//! slow down the others. The count resets after any reconcile that does not
//! return an error.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff: `min * 2^attempt`, capped at `max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    min: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Delay before retry number `attempt` (0-indexed)
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.min
            .checked_mul(factor)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

/// Per-object failure counts
#[derive(Debug)]
pub struct BackoffTracker {
    policy: ExponentialBackoff,
    failures: Mutex<HashMap<String, u32>>,
}

impl BackoffTracker {
    pub fn new(policy: ExponentialBackoff) -> Self {
        Self {
            policy,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Record a failure for `key`; returns the delay and the failure count
    pub fn next(&self, key: &str) -> (Duration, u32) {
        match self.failures.lock() {
            Ok(mut failures) => {
                let count = failures.entry(key.to_string()).or_insert(0);
                let delay = self.policy.delay(*count);
                *count = count.saturating_add(1);
                (delay, *count)
            }
            Err(e) => {
                warn!("Failed to lock backoff state: {}, using minimum backoff", e);
                (self.policy.delay(0), 0)
            }
        }
    }

    /// Forget the failures of `key`
    pub fn reset(&self, key: &str) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.remove(key);
        }
    }
}
