use std::time::Duration;

use crate::domain::errors::{DomainError, Result};

/// Reconnection configuration: fixed retry interval plus a hard budget of
/// consecutive failed attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_interval: Duration,
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(retry_interval: Duration, max_attempts: u32) -> Result<Self> {
        if retry_interval.is_zero() {
            return Err(DomainError::InvalidRetryInterval);
        }

        Ok(Self {
            retry_interval,
            max_attempts,
        })
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// True once the counter of consecutive failures has gone past the
    /// budget; the attempt that pushed it over is the last one made.
    pub fn budget_exhausted(&self, consecutive_failures: u32) -> bool {
        consecutive_failures > self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_secs(5),
            max_attempts: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retry_interval(), Duration::from_secs(5));
        assert_eq!(policy.max_attempts(), 5);
    }

    #[test]
    fn test_budget_exhausted_only_past_max() {
        let policy = RetryPolicy::new(Duration::from_millis(10), 2).unwrap();
        assert!(!policy.budget_exhausted(0));
        assert!(!policy.budget_exhausted(1));
        assert!(!policy.budget_exhausted(2));
        assert!(policy.budget_exhausted(3));
    }

    #[test]
    fn test_zero_budget_stops_after_first_failure() {
        let policy = RetryPolicy::new(Duration::from_millis(10), 0).unwrap();
        assert!(!policy.budget_exhausted(0));
        assert!(policy.budget_exhausted(1));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let result = RetryPolicy::new(Duration::ZERO, 5);
        assert!(result.is_err());
    }
}
