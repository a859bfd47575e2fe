//! Retry policies applied after transport errors
//!
//! The consumer asks its policy for a delay after every failed read and
//! resets it after every successful one. The default retries immediately;
//! exponential backoff is opt-in.

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// Strategy deciding how long to wait after a failed read
pub trait RetryPolicy: Send {
    /// Delay before the next read attempt
    fn next_delay(&mut self) -> Duration;

    /// Called after a message was read successfully
    fn reset(&mut self) {}
}

/// Retry the next read right away
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueImmediately;

impl RetryPolicy for ContinueImmediately {
    fn next_delay(&mut self) -> Duration {
        Duration::ZERO
    }
}

/// Exponential backoff with jitter, capped at a maximum delay
pub struct ExponentialRetry {
    backoff: ExponentialBackoff,
    max_interval: Duration,
}

impl ExponentialRetry {
    /// Create a policy starting at `initial` and never exceeding `max`
    pub fn new(initial: Duration, max: Duration) -> Self {
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(initial)
            .with_max_interval(max)
            .with_multiplier(2.0)
            .with_max_elapsed_time(None)
            .build();

        Self {
            backoff,
            max_interval: max,
        }
    }
}

impl RetryPolicy for ExponentialRetry {
    fn next_delay(&mut self) -> Duration {
        // Without a max elapsed time the backoff never gives up
        self.backoff
            .next_backoff()
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }

    fn reset(&mut self) {
        self.backoff.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continue_immediately_never_waits() {
        let mut policy = ContinueImmediately;
        for _ in 0..10 {
            assert_eq!(policy.next_delay(), Duration::ZERO);
        }
    }

    #[test]
    fn test_exponential_retry_is_capped() {
        let max = Duration::from_millis(400);
        let mut policy = ExponentialRetry::new(Duration::from_millis(50), max);

        for _ in 0..50 {
            let delay = policy.next_delay();
            assert!(delay > Duration::ZERO);
            assert!(delay <= max);
        }
    }

    #[test]
    fn test_exponential_retry_grows_and_resets() {
        let mut policy = ExponentialRetry::new(Duration::from_millis(100), Duration::from_secs(60));

        // Jitter is +/-50%, so the first delay is at most 150ms and the
        // fifth at least 100 * 2^4 * 0.5 = 800ms
        let first = policy.next_delay();
        for _ in 0..3 {
            policy.next_delay();
        }
        let fifth = policy.next_delay();
        assert!(first <= Duration::from_millis(150));
        assert!(fifth >= Duration::from_millis(800));

        policy.reset();
        assert!(policy.next_delay() <= Duration::from_millis(150));
    }
}
