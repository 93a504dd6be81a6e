use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use courier_core::{DeliveryStatus, DeliveryUpdate};

use crate::registry::DeliveryRegistry;

/// A carrier delivery-status callback.
///
/// Deserializes both snake_case field names and the PascalCase names common
/// in carrier webhook payloads, so an HTTP layer can feed the carrier's form
/// or JSON body straight in. Authenticating the webhook source is the HTTP
/// layer's concern, not Courier's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEvent {
    /// Provider-assigned message identifier.
    #[serde(alias = "MessageSid")]
    pub message_id: String,

    /// Carrier-reported status string (e.g. `delivered`).
    #[serde(alias = "MessageStatus")]
    pub status: String,

    /// Carrier error code, when the carrier reported one.
    #[serde(default, alias = "ErrorCode")]
    pub error_code: Option<String>,

    /// Carrier error message, when the carrier reported one.
    #[serde(default, alias = "ErrorMessage")]
    pub error_message: Option<String>,

    /// When the event occurred, when the carrier reported it.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Fold a delivery event into the registry.
///
/// Fire-and-forget relative to the dispatch path: this only takes the
/// registry's own lock and never blocks an in-flight send.
pub(crate) fn apply_event(registry: &DeliveryRegistry, event: DeliveryEvent) {
    let status = DeliveryStatus::from_carrier(&event.status);
    debug!(
        message_id = %event.message_id,
        carrier_status = %event.status,
        ?status,
        "delivery event received"
    );

    let delivered_at = if status == DeliveryStatus::Delivered {
        Some(event.timestamp.unwrap_or_else(Utc::now))
    } else {
        None
    };

    registry.record(
        &event.message_id,
        status,
        DeliveryUpdate {
            error_code: event.error_code,
            error_message: event.error_message,
            delivered_at,
            ..DeliveryUpdate::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_deserializes_snake_case() {
        let json = r#"{"message_id":"SM1","status":"delivered"}"#;
        let event: DeliveryEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.message_id, "SM1");
        assert_eq!(event.status, "delivered");
        assert!(event.error_code.is_none());
    }

    #[test]
    fn event_deserializes_carrier_field_names() {
        let json = r#"{"MessageSid":"SM2","MessageStatus":"undelivered","ErrorCode":"30005"}"#;
        let event: DeliveryEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.message_id, "SM2");
        assert_eq!(event.status, "undelivered");
        assert_eq!(event.error_code.as_deref(), Some("30005"));
    }

    #[test]
    fn apply_event_updates_registry() {
        let registry = DeliveryRegistry::new(10);
        registry.record("SM1", DeliveryStatus::Sent, DeliveryUpdate::cost(0.0079, "USD"));

        apply_event(
            &registry,
            DeliveryEvent {
                message_id: "SM1".into(),
                status: "delivered".into(),
                error_code: None,
                error_message: None,
                timestamp: None,
            },
        );

        let record = registry.get("SM1").unwrap();
        assert_eq!(record.status, DeliveryStatus::Delivered);
        assert!(record.delivered_at.is_some());
        assert_eq!(record.cost, Some(0.0079), "cost must survive the status event");
    }

    #[test]
    fn apply_event_for_unknown_id_creates_record() {
        let registry = DeliveryRegistry::new(10);
        apply_event(
            &registry,
            DeliveryEvent {
                message_id: "SM-unseen".into(),
                status: "failed".into(),
                error_code: Some("30008".into()),
                error_message: Some("unknown error".into()),
                timestamp: None,
            },
        );

        let record = registry.get("SM-unseen").unwrap();
        assert_eq!(record.status, DeliveryStatus::Failed);
        assert_eq!(record.error_code.as_deref(), Some("30008"));
    }
}
