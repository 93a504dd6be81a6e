use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest known delivery status of a dispatched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Accepted by the carrier, not yet handed to the network.
    Queued,
    /// Handed to the carrier network.
    Sent,
    /// Confirmed delivered to the handset.
    Delivered,
    /// Carrier-side failure before the network accepted the message.
    Failed,
    /// Accepted by the network but could not be delivered.
    Undelivered,
}

impl DeliveryStatus {
    /// Parse a carrier-reported status string.
    ///
    /// Carriers report a superset of the statuses Courier tracks and the
    /// exact vocabulary varies by vendor, so unknown strings map to
    /// [`Queued`](Self::Queued) rather than failing ingestion.
    #[must_use]
    pub fn from_carrier(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "sent" | "sending" | "accepted" => Self::Sent,
            "delivered" | "read" => Self::Delivered,
            "failed" | "canceled" => Self::Failed,
            "undelivered" => Self::Undelivered,
            _ => Self::Queued,
        }
    }

    /// Return the wire representation of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Undelivered => "undelivered",
        }
    }
}

/// The tracked state of one dispatched message.
///
/// Created when the dispatcher hands a message to the carrier, then updated
/// zero or more times by webhook callbacks. Keyed by the provider message id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Provider-assigned message identifier.
    pub message_id: String,

    /// Latest known status.
    pub status: DeliveryStatus,

    /// Carrier error code, when the carrier reported one.
    pub error_code: Option<String>,

    /// Carrier error message, when the carrier reported one.
    pub error_message: Option<String>,

    /// Timestamp of the delivery confirmation, when one arrived.
    pub delivered_at: Option<DateTime<Utc>>,

    /// Cost reported for this message.
    pub cost: Option<f64>,

    /// Currency unit for `cost` (e.g. `USD`).
    pub price_unit: Option<String>,

    /// When this record was first created.
    pub created_at: DateTime<Utc>,

    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DeliveryRecord {
    /// Create a fresh record with the given status and no optional fields.
    #[must_use]
    pub fn new(message_id: impl Into<String>, status: DeliveryStatus) -> Self {
        let now = Utc::now();
        Self {
            message_id: message_id.into(),
            status,
            error_code: None,
            error_message: None,
            delivered_at: None,
            cost: None,
            price_unit: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge an update into this record.
    ///
    /// Last-write-wins per field: only fields present in the update are
    /// overwritten, so a status-only webhook never erases a previously
    /// recorded cost.
    pub fn apply(&mut self, status: DeliveryStatus, update: DeliveryUpdate) {
        self.status = status;
        if let Some(code) = update.error_code {
            self.error_code = Some(code);
        }
        if let Some(message) = update.error_message {
            self.error_message = Some(message);
        }
        if let Some(at) = update.delivered_at {
            self.delivered_at = Some(at);
        }
        if let Some(cost) = update.cost {
            self.cost = Some(cost);
        }
        if let Some(unit) = update.price_unit {
            self.price_unit = Some(unit);
        }
        self.updated_at = Utc::now();
    }
}

/// Optional fields accompanying a delivery-record upsert.
///
/// Every field is optional; absent fields leave the existing record value
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryUpdate {
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub price_unit: Option<String>,
}

impl DeliveryUpdate {
    /// An update carrying only a cost and currency unit.
    #[must_use]
    pub fn cost(cost: f64, price_unit: impl Into<String>) -> Self {
        Self {
            cost: Some(cost),
            price_unit: Some(price_unit.into()),
            ..Self::default()
        }
    }

    /// An update carrying only a carrier error.
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(code.into()),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }
}
