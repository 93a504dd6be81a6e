use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use courier_core::Urgency;

use crate::error::TransportError;

/// One send request handed to a carrier transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    /// Destination phone number in E.164 format.
    pub to: String,
    /// Message body text.
    pub body: String,
    /// Sender address (phone number or alphanumeric sender id).
    pub from: String,
    /// Urgency hint for carriers that support prioritization.
    pub urgency_hint: Urgency,
}

/// What the carrier reported back for an accepted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierReceipt {
    /// Provider-assigned message identifier.
    pub message_id: String,
    /// Carrier-reported status at accept time (e.g. `queued`).
    pub status: Option<String>,
    /// Carrier-reported cost for this message, when known at accept time.
    pub cost: Option<f64>,
    /// Currency unit for `cost`.
    pub price_unit: Option<String>,
}

/// Strongly-typed transport trait with native `async fn`.
///
/// This trait is **not** object-safe because it uses native `async fn`
/// methods (which desugar to opaque `impl Future` return types). If you need
/// dynamic dispatch, use [`DynTransport`] instead -- every `Transport`
/// automatically implements `DynTransport` via a blanket implementation.
pub trait Transport: Send + Sync {
    /// Returns the unique name of this transport.
    fn name(&self) -> &str;

    /// Place one message with the carrier.
    fn send(
        &self,
        request: &SendRequest,
    ) -> impl std::future::Future<Output = Result<CarrierReceipt, TransportError>> + Send;

    /// Perform a lightweight round-trip (e.g. an account lookup) to verify
    /// the carrier is reachable and the credentials are valid.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}

/// Object-safe transport trait for use behind `Arc<dyn DynTransport>`.
///
/// Uses [`macro@async_trait`] to enable dynamic dispatch of async methods.
/// You generally should not implement this trait directly -- implement
/// [`Transport`] and rely on the blanket implementation.
#[async_trait]
pub trait DynTransport: Send + Sync {
    /// Returns the unique name of this transport.
    fn name(&self) -> &str;

    /// Place one message with the carrier.
    async fn send(&self, request: &SendRequest) -> Result<CarrierReceipt, TransportError>;

    /// Perform a lightweight round-trip to verify carrier reachability.
    async fn health_check(&self) -> Result<(), TransportError>;
}

/// Blanket implementation: any type that implements [`Transport`] also
/// implements [`DynTransport`], bridging the static and dynamic dispatch
/// worlds.
#[async_trait]
impl<T: Transport + Sync> DynTransport for T {
    fn name(&self) -> &str {
        Transport::name(self)
    }

    async fn send(&self, request: &SendRequest) -> Result<CarrierReceipt, TransportError> {
        Transport::send(self, request).await
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        Transport::health_check(self).await
    }
}

#[cfg(test)]
#[allow(clippy::unnecessary_literal_bound)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct EchoTransport;

    impl Transport for EchoTransport {
        fn name(&self) -> &str {
            "echo"
        }

        async fn send(&self, request: &SendRequest) -> Result<CarrierReceipt, TransportError> {
            Ok(CarrierReceipt {
                message_id: format!("echo-{}", request.to),
                status: Some("queued".into()),
                cost: Some(0.0079),
                price_unit: Some("USD".into()),
            })
        }

        async fn health_check(&self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn request() -> SendRequest {
        SendRequest {
            to: "+15551234567".into(),
            body: "hello".into(),
            from: "+15550000000".into(),
            urgency_hint: Urgency::Normal,
        }
    }

    #[tokio::test]
    async fn blanket_impl_bridges_to_dyn() {
        let transport: Arc<dyn DynTransport> = Arc::new(EchoTransport);
        assert_eq!(transport.name(), "echo");

        let receipt = transport.send(&request()).await.unwrap();
        assert_eq!(receipt.message_id, "echo-+15551234567");
        assert_eq!(receipt.cost, Some(0.0079));

        transport.health_check().await.unwrap();
    }

    #[test]
    fn request_serde_roundtrip() {
        let json = serde_json::to_string(&request()).unwrap();
        let back: SendRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to, "+15551234567");
        assert_eq!(back.urgency_hint, Urgency::Normal);
    }
}
