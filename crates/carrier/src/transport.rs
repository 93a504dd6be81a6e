use reqwest::Client;
use tracing::{debug, instrument, warn};

use courier_transport::{CarrierReceipt, SendRequest, Transport, TransportError};

use crate::config::CarrierConfig;
use crate::error::CarrierError;
use crate::types::{CarrierApiResponse, CarrierSendForm};

/// Carrier transport that places SMS messages via a REST messaging API.
///
/// Implements the [`Transport`] trait so the gateway can hold it behind an
/// `Arc<dyn DynTransport>`.
pub struct HttpCarrierTransport {
    config: CarrierConfig,
    client: Client,
}

impl HttpCarrierTransport {
    /// Create a new carrier transport with the given configuration.
    ///
    /// Uses a default `reqwest::Client` with reasonable timeouts.
    pub fn new(config: CarrierConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }

    /// Create a new carrier transport with a custom HTTP client.
    ///
    /// Useful for testing or for sharing a connection pool.
    pub fn with_client(config: CarrierConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the Messages API URL for this account.
    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url, self.config.account_id
        )
    }

    /// Build the account info URL (used for health checks).
    fn account_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}.json",
            self.config.api_base_url, self.config.account_id
        )
    }

    /// POST one message to the carrier's Messages endpoint.
    async fn send_message(&self, form: &CarrierSendForm) -> Result<CarrierApiResponse, CarrierError> {
        let url = self.messages_url();

        debug!(to = %form.to, "sending SMS via carrier API");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_id, Some(&self.config.auth_token))
            .form(form)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("carrier API rate limit hit");
            return Err(CarrierError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CarrierError::Api(format!("HTTP {status}: {body}")));
        }

        let api_response: CarrierApiResponse = response.json().await?;

        if let Some(code) = api_response.error_code {
            let msg = api_response
                .error_message
                .unwrap_or_else(|| format!("error code {code}"));
            return Err(CarrierError::Api(msg));
        }

        Ok(api_response)
    }
}

impl Transport for HttpCarrierTransport {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "carrier-http"
    }

    #[instrument(skip(self, request), fields(to = %request.to, transport = "carrier-http"))]
    async fn send(&self, request: &SendRequest) -> Result<CarrierReceipt, TransportError> {
        let form = CarrierSendForm {
            to: request.to.clone(),
            from: request.from.clone(),
            body: request.body.clone(),
        };

        let api_response = self.send_message(&form).await?;
        let cost = api_response.cost();

        let message_id = api_response.sid.ok_or_else(|| {
            TransportError::Serialization("carrier response is missing a message sid".into())
        })?;

        Ok(CarrierReceipt {
            message_id,
            status: api_response.status,
            cost,
            price_unit: api_response.price_unit,
        })
    }

    #[instrument(skip(self), fields(transport = "carrier-http"))]
    async fn health_check(&self) -> Result<(), TransportError> {
        let url = self.account_url();

        debug!("performing carrier health check via account lookup");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.account_id, Some(&self.config.auth_token))
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Connection(format!("HTTP {status}: {body}")));
        }

        debug!("carrier health check passed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Urgency;
    use courier_transport::{SendRequest, Transport, TransportError};

    use super::*;
    use crate::config::CarrierConfig;

    /// A minimal mock HTTP server built on tokio that returns canned responses.
    struct MockCarrierServer {
        listener: tokio::net::TcpListener,
        base_url: String,
    }

    impl MockCarrierServer {
        async fn start() -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock server");
            let port = listener.local_addr().unwrap().port();
            let base_url = format!("http://127.0.0.1:{port}");
            Self { listener, base_url }
        }

        async fn respond_once(self, status_code: u16, body: &str) {
            let body = body.to_owned();
            let (mut stream, _) = self.listener.accept().await.unwrap();

            use tokio::io::{AsyncReadExt, AsyncWriteExt};

            let mut buf = vec![0u8; 8192];
            let _ = stream.read(&mut buf).await.unwrap();

            let response = format!(
                "HTTP/1.1 {status_code} OK\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }

        async fn respond_rate_limited(self) {
            let body = r#"{"error_code":429,"error_message":"rate limited"}"#;
            self.respond_once(429, body).await;
        }
    }

    fn make_request() -> SendRequest {
        SendRequest {
            to: "+15559876543".into(),
            body: "Hello from Courier!".into(),
            from: "+15551234567".into(),
            urgency_hint: Urgency::Normal,
        }
    }

    #[test]
    fn transport_name() {
        let config = CarrierConfig::new("AC123", "token");
        let transport = HttpCarrierTransport::new(config);
        assert_eq!(transport.name(), "carrier-http");
    }

    #[tokio::test]
    async fn send_success() {
        let server = MockCarrierServer::start().await;
        let config = CarrierConfig::new("AC123", "token").with_api_base_url(&server.base_url);
        let transport = HttpCarrierTransport::new(config);

        let response_body = r#"{"sid":"SM123","status":"queued","price":"-0.0079","price_unit":"USD","error_code":null,"error_message":null}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(200, response_body).await;
        });

        let result = transport.send(&make_request()).await;
        server_handle.await.unwrap();

        let receipt = result.expect("send should succeed");
        assert_eq!(receipt.message_id, "SM123");
        assert_eq!(receipt.status.as_deref(), Some("queued"));
        assert!((receipt.cost.unwrap() - 0.0079).abs() < 1e-9);
        assert_eq!(receipt.price_unit.as_deref(), Some("USD"));
    }

    #[tokio::test]
    async fn send_rate_limited_is_retryable() {
        let server = MockCarrierServer::start().await;
        let config = CarrierConfig::new("AC123", "token").with_api_base_url(&server.base_url);
        let transport = HttpCarrierTransport::new(config);

        let server_handle = tokio::spawn(async move {
            server.respond_rate_limited().await;
        });

        let err = transport.send(&make_request()).await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, TransportError::RateLimited));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn send_api_error_not_retryable() {
        let server = MockCarrierServer::start().await;
        let config = CarrierConfig::new("AC123", "bad-token").with_api_base_url(&server.base_url);
        let transport = HttpCarrierTransport::new(config);

        let response_body = r#"{"sid":null,"status":null,"price":null,"price_unit":null,"error_code":20003,"error_message":"Authentication Error"}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(200, response_body).await;
        });

        let err = transport.send(&make_request()).await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, TransportError::SendFailed(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn send_missing_sid_is_an_error() {
        let server = MockCarrierServer::start().await;
        let config = CarrierConfig::new("AC123", "token").with_api_base_url(&server.base_url);
        let transport = HttpCarrierTransport::new(config);

        let response_body = r#"{"sid":null,"status":"queued","price":null,"price_unit":null,"error_code":null,"error_message":null}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(200, response_body).await;
        });

        let err = transport.send(&make_request()).await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, TransportError::Serialization(_)));
    }

    #[tokio::test]
    async fn health_check_success() {
        let server = MockCarrierServer::start().await;
        let config = CarrierConfig::new("AC123", "token").with_api_base_url(&server.base_url);
        let transport = HttpCarrierTransport::new(config);

        let response_body = r#"{"sid":"AC123","friendly_name":"My Account","status":"active"}"#;
        let server_handle = tokio::spawn(async move {
            server.respond_once(200, response_body).await;
        });

        let result = transport.health_check().await;
        server_handle.await.unwrap();

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn health_check_rate_limited() {
        let server = MockCarrierServer::start().await;
        let config = CarrierConfig::new("AC123", "token").with_api_base_url(&server.base_url);
        let transport = HttpCarrierTransport::new(config);

        let server_handle = tokio::spawn(async move {
            server.respond_rate_limited().await;
        });

        let err = transport.health_check().await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, TransportError::RateLimited));
        assert!(err.is_retryable());
    }
}
