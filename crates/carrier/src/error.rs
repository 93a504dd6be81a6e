use courier_transport::TransportError;
use thiserror::Error;

/// Errors specific to the HTTP carrier transport.
///
/// These are internal errors that get converted into [`TransportError`] at
/// the public API boundary.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The carrier API returned an error response.
    #[error("carrier API error: {0}")]
    Api(String),

    /// The carrier received an HTTP 429 (Too Many Requests) response.
    #[error("rate limited by carrier")]
    RateLimited,
}

impl From<CarrierError> for TransportError {
    fn from(err: CarrierError) -> Self {
        match err {
            CarrierError::Http(e) if e.is_timeout() => {
                TransportError::Timeout(std::time::Duration::from_secs(30))
            }
            CarrierError::Http(e) => TransportError::Connection(e.to_string()),
            CarrierError::Api(msg) => TransportError::SendFailed(msg),
            CarrierError::RateLimited => TransportError::RateLimited,
        }
    }
}
