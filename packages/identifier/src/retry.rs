//! Backoff policy for identifier conflicts.

use std::time::Duration;

/// Default number of retries after the first insert attempt.
///
/// With the default base delay the waits are 25, 50, 100, 200 and 400 ms,
/// under a second in total before a conflict is surfaced.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(25);

/// Upper bound for any single backoff delay.
pub const MAX_DELAY: Duration = Duration::from_secs(2);

/// Exponential backoff settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without sleeping.
    #[must_use]
    pub const fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based), capped at
    /// [`MAX_DELAY`].
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(MAX_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_from_base() {
        let policy = RetryPolicy::default();
        let delays: Vec<u128> = (1..=5).map(|r| policy.delay_for(r).as_millis()).collect();
        assert_eq!(delays, vec![25, 50, 100, 200, 400]);
    }

    #[test]
    fn caps_large_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(40), MAX_DELAY);
        assert_eq!(policy.delay_for(u32::MAX), MAX_DELAY);
    }

    #[test]
    fn immediate_never_sleeps() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay_for(3), Duration::ZERO);
    }
}
