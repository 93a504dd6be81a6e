use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during a carrier transport operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The carrier rejected or failed to place the message.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The carrier did not respond within the allowed duration.
    ///
    /// Ambiguous outcome: the message may still have been placed. The
    /// dispatcher treats this as retryable and accepts the duplicate-send
    /// risk.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A network or connection-level error occurred.
    #[error("connection error: {0}")]
    Connection(String),

    /// The transport was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The carrier rejected the request due to its own rate limiting.
    #[error("rate limited by carrier")]
    RateLimited,

    /// A request or response could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TransportError {
    /// Returns `true` if the error is transient and the send may succeed on
    /// retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connection(_) | Self::RateLimited
        )
    }
}
