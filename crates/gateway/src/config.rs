use std::time::Duration;

use crate::batch::{DEFAULT_CONCURRENCY, INTER_CHUNK_DELAY};
use crate::error::GatewayError;
use crate::ratewindow::RateWindowLimits;
use crate::registry::DEFAULT_REGISTRY_CAPACITY;
use crate::retry::RetryPolicy;

/// Environment variable naming the sending address.
pub const ENV_FROM_NUMBER: &str = "COURIER_FROM_NUMBER";
/// Environment variables overriding the rate ceilings.
pub const ENV_RATE_PER_MINUTE: &str = "COURIER_RATE_PER_MINUTE";
pub const ENV_RATE_PER_HOUR: &str = "COURIER_RATE_PER_HOUR";
pub const ENV_RATE_PER_DAY: &str = "COURIER_RATE_PER_DAY";

/// Gateway configuration.
///
/// Carrier credentials are not part of this struct; they belong to whichever
/// transport implementation is plugged in. A gateway built without a
/// transport (or without `from_address`) reports
/// [`SystemStatus::NotConfigured`](crate::SystemStatus::NotConfigured) and
/// fails every send fast.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Sender address (E.164 phone number) stamped on every outbound message.
    pub from_address: Option<String>,

    /// Ceilings for the three rate windows.
    pub limits: RateWindowLimits,

    /// Retry budget and backoff curve for transient transport failures.
    pub retry: RetryPolicy,

    /// Capacity ceiling of the delivery registry.
    pub registry_capacity: usize,

    /// Chunk size used by batch dispatch when the caller does not specify
    /// one.
    pub default_concurrency: usize,

    /// Cooperative pause between batch chunks.
    pub inter_chunk_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            from_address: None,
            limits: RateWindowLimits::default(),
            retry: RetryPolicy::default(),
            registry_capacity: DEFAULT_REGISTRY_CAPACITY,
            default_concurrency: DEFAULT_CONCURRENCY,
            inter_chunk_delay: INTER_CHUNK_DELAY,
        }
    }
}

impl GatewayConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads [`ENV_FROM_NUMBER`] and the three rate-ceiling overrides;
    /// unset variables fall back to defaults, unparseable ceilings are
    /// configuration errors.
    pub fn from_env() -> Result<Self, GatewayError> {
        let defaults = RateWindowLimits::default();
        let limits = RateWindowLimits {
            per_minute: read_ceiling(ENV_RATE_PER_MINUTE)?.unwrap_or(defaults.per_minute),
            per_hour: read_ceiling(ENV_RATE_PER_HOUR)?.unwrap_or(defaults.per_hour),
            per_day: read_ceiling(ENV_RATE_PER_DAY)?.unwrap_or(defaults.per_day),
        };

        Ok(Self {
            from_address: std::env::var(ENV_FROM_NUMBER).ok(),
            limits,
            ..Self::default()
        })
    }

    /// Set the sending address.
    #[must_use]
    pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
        self.from_address = Some(address.into());
        self
    }

    /// Set the rate-window ceilings.
    #[must_use]
    pub fn with_limits(mut self, limits: RateWindowLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn read_ceiling(name: &str) -> Result<Option<u32>, GatewayError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| GatewayError::Configuration(format!("{name} must be an integer, got {raw:?}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GatewayConfig::default();
        assert!(config.from_address.is_none());
        assert_eq!(config.limits.per_minute, 100);
        assert_eq!(config.limits.per_hour, 3000);
        assert_eq!(config.limits.per_day, 50_000);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.registry_capacity, 1000);
        assert_eq!(config.default_concurrency, 5);
        assert_eq!(config.inter_chunk_delay, Duration::from_millis(100));
    }

    #[test]
    fn builder_setters() {
        let config = GatewayConfig::default()
            .with_from_address("+15550000000")
            .with_limits(RateWindowLimits {
                per_minute: 10,
                per_hour: 100,
                per_day: 1000,
            });
        assert_eq!(config.from_address.as_deref(), Some("+15550000000"));
        assert_eq!(config.limits.per_minute, 10);
    }
}
