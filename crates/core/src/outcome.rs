use serde::{Deserialize, Serialize};

/// Result of dispatching one message, including the retry budget consumed.
///
/// Produced exactly once per `send` call and never mutated afterward. All
/// failure modes (misconfiguration, validation, throttling, transport
/// exhaustion) are reported through this value; the dispatcher never lets a
/// transport error escape as a Rust error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Whether the message was accepted by the carrier.
    pub success: bool,

    /// Provider-assigned message identifier. Present iff `success`.
    pub message_id: Option<String>,

    /// Human-readable error description. Present iff `!success`.
    pub error: Option<String>,

    /// Cost reported by the carrier for this message, in account currency.
    pub cost: f64,

    /// Delivery status reported by the carrier at send time (e.g. `queued`).
    pub carrier_status: Option<String>,

    /// Number of failed transport attempts consumed before this outcome.
    pub retries: u32,
}

impl DispatchOutcome {
    /// Create a successful outcome carrying the provider message id.
    #[must_use]
    pub fn success(message_id: impl Into<String>, cost: f64, retries: u32) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
            cost,
            carrier_status: None,
            retries,
        }
    }

    /// Create a failed outcome carrying the final error description.
    #[must_use]
    pub fn failure(error: impl Into<String>, retries: u32) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
            cost: 0.0,
            carrier_status: None,
            retries,
        }
    }

    /// Attach the carrier-reported status.
    #[must_use]
    pub fn with_carrier_status(mut self, status: impl Into<String>) -> Self {
        self.carrier_status = Some(status.into());
        self
    }
}

/// Aggregate counts and cost across one batch dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Total messages in the batch.
    pub total: usize,
    /// Messages accepted by the carrier.
    pub successful: usize,
    /// Messages that ended in a failure outcome.
    pub failed: usize,
    /// Sum of carrier-reported costs across successful sends.
    pub total_cost: f64,
    /// `total_cost / successful`, or zero when nothing succeeded.
    pub average_cost: f64,
}

impl BatchSummary {
    /// Summarize a slice of per-message outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[DispatchOutcome]) -> Self {
        let successful = outcomes.iter().filter(|o| o.success).count();
        let total_cost: f64 = outcomes.iter().filter(|o| o.success).map(|o| o.cost).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_cost = if successful == 0 {
            0.0
        } else {
            total_cost / successful as f64
        };
        Self {
            total: outcomes.len(),
            successful,
            failed: outcomes.len() - successful,
            total_cost,
            average_cost,
        }
    }
}

/// Per-message outcomes plus the batch-level summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Outcome for each input message, in input order.
    pub outcomes: Vec<DispatchOutcome>,
    /// Aggregate counts and cost.
    pub summary: BatchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_outcome_shape() {
        let outcome = DispatchOutcome::success("SM123", 0.0079, 1).with_carrier_status("queued");
        assert!(outcome.success);
        assert_eq!(outcome.message_id.as_deref(), Some("SM123"));
        assert!(outcome.error.is_none());
        assert_eq!(outcome.retries, 1);
        assert_eq!(outcome.carrier_status.as_deref(), Some("queued"));
    }

    #[test]
    fn failure_outcome_shape() {
        let outcome = DispatchOutcome::failure("connection reset", 3);
        assert!(!outcome.success);
        assert!(outcome.message_id.is_none());
        assert_eq!(outcome.error.as_deref(), Some("connection reset"));
        assert_eq!(outcome.cost, 0.0);
    }

    #[test]
    fn summary_aggregates_only_successes() {
        let outcomes = vec![
            DispatchOutcome::success("a", 0.01, 0),
            DispatchOutcome::failure("boom", 3),
            DispatchOutcome::success("b", 0.03, 1),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert!((summary.total_cost - 0.04).abs() < 1e-9);
        assert!((summary.average_cost - 0.02).abs() < 1e-9);
    }

    #[test]
    fn summary_empty_batch() {
        let summary = BatchSummary::from_outcomes(&[]);
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn outcome_serde_roundtrip() {
        let outcome = DispatchOutcome::success("SM9", 0.0079, 2);
        let json = serde_json::to_string(&outcome).unwrap();
        let back: DispatchOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message_id, outcome.message_id);
        assert_eq!(back.retries, 2);
    }
}
