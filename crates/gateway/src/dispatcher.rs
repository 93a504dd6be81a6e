use std::sync::{Arc, LazyLock};
use std::time::Instant;

use regex::Regex;
use tracing::{debug, instrument, warn};

use courier_core::{DeliveryStatus, DeliveryUpdate, DispatchOutcome, OutboundMessage};
use courier_transport::{DynTransport, SendRequest};

use crate::ledger::CostLedger;
use crate::metrics::GatewayMetrics;
use crate::ratewindow::RateWindowTracker;
use crate::registry::DeliveryRegistry;
use crate::retry::RetryPolicy;

/// E.164 destination shape, checked after separators are stripped.
static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("E.164 pattern is valid"));

/// Strip the separator characters commonly pasted into phone numbers.
pub(crate) fn normalize_destination(to: &str) -> String {
    to.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

/// Sends one message through the transport with rate gating, retry, and
/// effects recording.
///
/// Fail-fast rejections (unconfigured transport, invalid destination,
/// exhausted rate window) never touch the network and consume no retry
/// budget. Transient transport errors are retried with capped exponential
/// backoff per the configured [`RetryPolicy`]; all failures are converted
/// into [`DispatchOutcome`] values rather than propagated.
///
/// A timeout on an earlier attempt is ambiguous: the carrier may have placed
/// the message even though the attempt errored. Retrying accepts the
/// resulting duplicate-send risk; callers that cannot tolerate duplicates
/// must deduplicate at a higher layer.
pub struct RetryingDispatcher {
    transport: Option<Arc<dyn DynTransport>>,
    from_address: Option<String>,
    policy: RetryPolicy,
    tracker: Arc<RateWindowTracker>,
    ledger: Arc<CostLedger>,
    registry: Arc<DeliveryRegistry>,
    metrics: Arc<GatewayMetrics>,
}

impl RetryingDispatcher {
    /// Wire a dispatcher from its collaborating components.
    #[must_use]
    pub fn new(
        transport: Option<Arc<dyn DynTransport>>,
        from_address: Option<String>,
        policy: RetryPolicy,
        tracker: Arc<RateWindowTracker>,
        ledger: Arc<CostLedger>,
        registry: Arc<DeliveryRegistry>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            transport,
            from_address,
            policy,
            tracker,
            ledger,
            registry,
            metrics,
        }
    }

    /// Whether a transport and sending address have both been supplied.
    pub fn is_configured(&self) -> bool {
        self.transport.is_some() && self.from_address.is_some()
    }

    /// Dispatch one message, retrying transient transport failures.
    #[instrument(skip(self, message), fields(to = %message.to, urgency = message.urgency.as_str()))]
    pub async fn send(&self, message: OutboundMessage) -> DispatchOutcome {
        self.metrics.increment_attempts();
        let start = Instant::now();

        let (Some(transport), Some(from)) = (self.transport.as_deref(), self.from_address.as_deref())
        else {
            return self.fail_fast(start, "transport not configured");
        };

        let destination = normalize_destination(&message.to);
        if !E164.is_match(&destination) {
            return self.fail_fast(start, format!("invalid destination address: {}", message.to));
        }

        let reservation = self.tracker.try_reserve();
        if reservation.day_rolled {
            // Keep the daily cost bucket aligned with the day rate window.
            self.ledger.reset_daily();
        }
        if !reservation.allowed {
            return self.fail_fast(start, "rate window exhausted; re-queue and try again later");
        }

        let request = SendRequest {
            to: destination,
            body: message.body.clone(),
            from: from.to_owned(),
            urgency_hint: message.urgency,
        };

        let mut retries = 0u32;
        let mut last_error: Option<String> = None;

        for attempt in 1..=self.policy.max_retries {
            debug!(attempt, max_retries = self.policy.max_retries, "attempting carrier send");

            match transport.send(&request).await {
                Ok(receipt) => {
                    let cost = receipt.cost.unwrap_or(0.0);
                    self.ledger.record(cost);
                    self.registry.record(
                        &receipt.message_id,
                        DeliveryStatus::Sent,
                        DeliveryUpdate {
                            cost: receipt.cost,
                            price_unit: receipt.price_unit.clone(),
                            ..DeliveryUpdate::default()
                        },
                    );
                    self.metrics.record_success(start.elapsed());
                    debug!(message_id = %receipt.message_id, attempt, "carrier accepted message");

                    let mut outcome = DispatchOutcome::success(receipt.message_id, cost, retries);
                    if let Some(status) = receipt.status {
                        outcome = outcome.with_carrier_status(status);
                    }
                    return outcome;
                }
                Err(err) => {
                    retries += 1;
                    if err.is_retryable() && self.policy.allows_another(attempt) {
                        let delay = self.policy.backoff_after(attempt);
                        warn!(
                            attempt,
                            error = %err,
                            delay_ms = %delay.as_millis(),
                            "retryable transport error, will retry"
                        );
                        self.metrics.increment_retried();
                        last_error = Some(err.to_string());
                        tokio::time::sleep(delay).await;
                    } else {
                        warn!(
                            attempt,
                            error = %err,
                            retryable = err.is_retryable(),
                            "dispatch failed"
                        );
                        let text = err.to_string();
                        self.metrics.record_failure(start.elapsed(), &text);
                        return DispatchOutcome::failure(text, retries);
                    }
                }
            }
        }

        // Only reachable with a zero retry budget.
        let text = last_error.unwrap_or_else(|| "retry budget is zero".to_owned());
        self.metrics.record_failure(start.elapsed(), &text);
        DispatchOutcome::failure(text, retries)
    }

    fn fail_fast(&self, start: Instant, error: impl Into<String>) -> DispatchOutcome {
        let error = error.into();
        warn!(error = %error, "dispatch rejected before transport call");
        self.metrics.record_failure(start.elapsed(), &error);
        DispatchOutcome::failure(error, 0)
    }
}
