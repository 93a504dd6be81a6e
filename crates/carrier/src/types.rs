use serde::{Deserialize, Serialize};

/// Form-encoded request body for the carrier's Messages API.
///
/// The carrier expects `application/x-www-form-urlencoded` rather than JSON.
#[derive(Debug, Clone, Serialize)]
pub struct CarrierSendForm {
    /// Destination phone number in E.164 format.
    #[serde(rename = "To")]
    pub to: String,

    /// Sender phone number or alphanumeric sender id.
    #[serde(rename = "From")]
    pub from: String,

    /// Message body text.
    #[serde(rename = "Body")]
    pub body: String,
}

/// Response from the carrier's Messages API.
#[derive(Debug, Clone, Deserialize)]
pub struct CarrierApiResponse {
    /// Message SID (unique identifier).
    pub sid: Option<String>,

    /// Message status (e.g., `"queued"`, `"sent"`, `"delivered"`).
    pub status: Option<String>,

    /// Price of the message. The carrier reports this as a decimal string,
    /// negative to denote a charge, and `null` until the message is priced.
    pub price: Option<String>,

    /// Currency unit for `price` (e.g. `"USD"`).
    pub price_unit: Option<String>,

    /// Carrier error code (present on failure).
    pub error_code: Option<i32>,

    /// Carrier error message (present on failure).
    pub error_message: Option<String>,
}

impl CarrierApiResponse {
    /// The message cost as a positive amount, when the carrier priced it.
    #[must_use]
    pub fn cost(&self) -> Option<f64> {
        self.price
            .as_deref()
            .and_then(|p| p.parse::<f64>().ok())
            .map(f64::abs)
    }
}
