use std::time::Duration;

/// Retry policy for transient transport failures.
///
/// Pure: given the number of the attempt that just failed, it answers how
/// long to wait before the next one. All side effects (sleeping, metrics,
/// outcome recording) live in the dispatcher, so backoff timing is testable
/// without any network mocking.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum transport attempts per dispatch.
    pub max_retries: u32,
    /// Delay before the second attempt; doubles each attempt after that.
    pub base: Duration,
    /// Upper bound on any computed delay.
    pub cap: Duration,
}

impl RetryPolicy {
    /// Compute the backoff delay after the given one-based `attempt` fails:
    /// `min(base * 2^(attempt - 1), cap)`.
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32);
        let millis = u64::try_from(self.base.as_millis())
            .unwrap_or(u64::MAX)
            .saturating_mul(1_u64 << exponent);
        Duration::from_millis(millis).min(self.cap)
    }

    /// Whether another attempt is allowed after `attempt` attempts ran.
    #[must_use]
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base: Duration::from_millis(1000),
            cap: Duration::from_millis(10_000),
        }
    }
}
