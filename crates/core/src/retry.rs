//! Bounded Retry Policy
//!
//! Pure configuration for exponential-backoff retries. The policy carries no
//! mutable state; it is applied per call by the transport layer.

use std::time::Duration;

/// Exponential backoff configuration for a bounded-retry request.
///
/// Delay before retry `n` (1-based) is `initial_delay * backoff_factor^(n-1)`.
/// Delays apply only between attempts, never after the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first (>= 1).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt (>= 1.0).
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a policy, clamping the fields into their valid ranges
    /// (`max_attempts >= 1`, `backoff_factor >= 1.0`).
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            backoff_factor: backoff_factor.max(1.0),
        }
    }

    /// Delay to wait before retry `attempt` (1-based index of the attempt
    /// that just failed).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        self.initial_delay
            .mul_f64(self.backoff_factor.powi(exponent as i32))
    }
}
