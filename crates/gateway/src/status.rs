use serde::{Deserialize, Serialize};

/// Coarse operational state of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    /// No transport (or sending address) has been supplied; every send
    /// fails fast.
    NotConfigured,
    /// At least one rate window is currently at its ceiling.
    RateLimited,
    /// Configured and accepting sends.
    Healthy,
}

/// Result of an active health check, including one transport round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// `true` only when configured, the carrier probe succeeded, and no
    /// rate window is exhausted.
    pub healthy: bool,
    /// The derived status at check time.
    pub status: SystemStatus,
    /// Probe failure detail, when the carrier probe failed.
    pub details: Option<String>,
}
