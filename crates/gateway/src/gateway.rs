use std::sync::Arc;

use tracing::{info, instrument};

use courier_core::{BatchReport, DeliveryRecord, DispatchOutcome, OutboundMessage};
use courier_transport::DynTransport;

use crate::batch;
use crate::dispatcher::RetryingDispatcher;
use crate::ledger::{CostAnalysis, CostLedger};
use crate::metrics::{GatewayMetrics, MetricsSnapshot};
use crate::ratewindow::{RateWindowSnapshot, RateWindowTracker};
use crate::registry::DeliveryRegistry;
use crate::status::{HealthReport, SystemStatus};
use crate::webhook::{self, DeliveryEvent};

/// The outbound notification gateway.
///
/// One `Gateway` is constructed at process start (see
/// [`GatewayBuilder`](crate::GatewayBuilder)) and shared by reference across
/// tasks; every component it wires together is internally synchronized.
/// Webhook ingestion and dispatch flow through independent locks and never
/// block each other.
pub struct Gateway {
    pub(crate) dispatcher: RetryingDispatcher,
    pub(crate) transport: Option<Arc<dyn DynTransport>>,
    pub(crate) tracker: Arc<RateWindowTracker>,
    pub(crate) ledger: Arc<CostLedger>,
    pub(crate) registry: Arc<DeliveryRegistry>,
    pub(crate) metrics: Arc<GatewayMetrics>,
    pub(crate) default_concurrency: usize,
    pub(crate) inter_chunk_delay: std::time::Duration,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("configured", &self.transport.is_some())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Dispatch a single message. See
    /// [`RetryingDispatcher::send`](crate::RetryingDispatcher::send) for the
    /// full fail-fast and retry behavior.
    pub async fn send(&self, message: OutboundMessage) -> DispatchOutcome {
        self.dispatcher.send(message).await
    }

    /// Dispatch a batch with the configured default concurrency.
    pub async fn dispatch_batch(&self, messages: Vec<OutboundMessage>) -> BatchReport {
        self.dispatch_batch_with_concurrency(messages, self.default_concurrency)
            .await
    }

    /// Dispatch a batch as sequential chunks of `concurrency` concurrent
    /// sends.
    pub async fn dispatch_batch_with_concurrency(
        &self,
        messages: Vec<OutboundMessage>,
        concurrency: usize,
    ) -> BatchReport {
        batch::dispatch_batch(&self.dispatcher, messages, concurrency, self.inter_chunk_delay).await
    }

    /// Look up the latest known delivery record for a message.
    pub fn delivery_status(&self, message_id: &str) -> Option<DeliveryRecord> {
        self.registry.get(message_id)
    }

    /// Fold a carrier delivery callback into the registry.
    pub fn ingest_delivery_event(&self, event: DeliveryEvent) {
        webhook::apply_event(&self.registry, event);
    }

    /// Produce the running cost report with projections and
    /// recommendations.
    pub fn cost_analysis(&self) -> CostAnalysis {
        self.ledger
            .analysis(self.tracker.limits(), &self.metrics.snapshot())
    }

    /// Derive the coarse operational status without touching the carrier.
    pub fn system_status(&self) -> SystemStatus {
        if !self.dispatcher.is_configured() {
            SystemStatus::NotConfigured
        } else if self.tracker.is_throttled() {
            SystemStatus::RateLimited
        } else {
            SystemStatus::Healthy
        }
    }

    /// Actively check health, including one lightweight carrier round-trip.
    ///
    /// Healthy only when a transport is configured, the carrier probe
    /// succeeds, and no rate window is currently exhausted.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthReport {
        let Some(transport) = self.transport.as_deref() else {
            return HealthReport {
                healthy: false,
                status: SystemStatus::NotConfigured,
                details: Some("transport not configured".into()),
            };
        };
        if !self.dispatcher.is_configured() {
            return HealthReport {
                healthy: false,
                status: SystemStatus::NotConfigured,
                details: Some("sending address not configured".into()),
            };
        }

        let probe = transport.health_check().await;
        let status = self.system_status();
        match probe {
            Ok(()) => {
                info!(?status, "carrier probe succeeded");
                HealthReport {
                    healthy: status == SystemStatus::Healthy,
                    status,
                    details: None,
                }
            }
            Err(err) => HealthReport {
                healthy: false,
                status,
                details: Some(err.to_string()),
            },
        }
    }

    /// Take a point-in-time snapshot of the dispatch metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Take a point-in-time snapshot of the rate windows.
    pub fn rate_windows(&self) -> RateWindowSnapshot {
        self.tracker.snapshot()
    }
}
