use thiserror::Error;

/// Errors that can occur while constructing or configuring a gateway.
///
/// Dispatch failures never surface here; they are reported as
/// [`DispatchOutcome`](courier_core::DispatchOutcome) values.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway was misconfigured (e.g. an unparseable rate ceiling).
    #[error("configuration error: {0}")]
    Configuration(String),
}
