use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Urgency tier for an outbound message.
///
/// Courier itself does not reorder messages by urgency; the tier is passed
/// through to the carrier transport as a delivery hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Urgency {
    /// Return the wire representation of this urgency tier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// A single outbound text message.
///
/// Immutable once constructed: callers build a message with [`new`](Self::new)
/// and the `with_*` methods, then hand it to the dispatcher by value. Content
/// generation (templating) is the caller's concern; `template_tag` only labels
/// which template produced the body, for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Destination phone number in E.164 format.
    pub to: String,

    /// Message body text.
    pub body: String,

    /// Urgency tier, passed to the transport as a hint.
    #[serde(default)]
    pub urgency: Urgency,

    /// Optional label identifying the template that produced the body.
    pub template_tag: Option<String>,

    /// Arbitrary caller-supplied metadata labels.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Timestamp when the message was constructed.
    pub created_at: DateTime<Utc>,
}

impl OutboundMessage {
    /// Create a new message with the required fields and `created_at` set to
    /// now.
    #[must_use]
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
            urgency: Urgency::default(),
            template_tag: None,
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Set the urgency tier.
    #[must_use]
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    /// Set the template tag.
    #[must_use]
    pub fn with_template_tag(mut self, tag: impl Into<String>) -> Self {
        self.template_tag = Some(tag.into());
        self
    }

    /// Attach a metadata label.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
