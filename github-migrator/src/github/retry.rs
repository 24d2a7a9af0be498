//! Retry schedule for transient API failures.

use backon::BackoffBuilder;
use std::time::Duration;

/// Default number of attempts, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 7;

/// Wait before the first and second retries.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(60);

/// Upper bound for any single wait.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(600);

/// Backoff policy for retryable API errors.
///
/// The first two retries wait `base_delay`; each later retry doubles the
/// previous wait, never exceeding `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the initial one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Returns the wait before the given retry (1-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry <= 2 {
            return self.base_delay.min(self.max_delay);
        }
        let factor = 2u32.checked_pow(retry - 2).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Number of retries allowed after the first attempt.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_attempts.saturating_sub(1)
    }
}

impl BackoffBuilder for RetryPolicy {
    type Backoff = RetrySchedule;

    fn build(self) -> Self::Backoff {
        RetrySchedule {
            policy: self,
            retry: 0,
        }
    }
}

/// Iterator over the waits of a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    policy: RetryPolicy,
    retry: u32,
}

impl Iterator for RetrySchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.retry >= self.policy.max_retries() {
            return None;
        }
        self.retry += 1;
        Some(self.policy.delay_for(self.retry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let waits: Vec<u64> = RetryPolicy::default()
            .build()
            .map(|delay| delay.as_secs())
            .collect();

        assert_eq!(waits, vec![60, 60, 120, 240, 480, 600]);
    }

    #[test]
    fn test_delay_doubles_from_third_retry() {
        let policy = RetryPolicy {
            max_attempts: 20,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(1000),
        };

        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for(6), Duration::from_secs(16));
        assert_eq!(policy.delay_for(40), Duration::from_secs(1000));
    }

    #[test]
    fn test_single_attempt_never_waits() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };

        assert_eq!(policy.build().count(), 0);
    }
}
