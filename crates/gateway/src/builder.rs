use std::sync::Arc;

use courier_transport::DynTransport;

use crate::config::GatewayConfig;
use crate::dispatcher::RetryingDispatcher;
use crate::gateway::Gateway;
use crate::ledger::CostLedger;
use crate::metrics::GatewayMetrics;
use crate::ratewindow::RateWindowTracker;
use crate::registry::DeliveryRegistry;

/// Fluent builder for constructing a [`Gateway`] instance.
///
/// The transport is optional on purpose: a gateway built without one (or
/// without a sending address) exists in the
/// [`NotConfigured`](crate::SystemStatus::NotConfigured) state and fails
/// every send fast without consuming a retry budget, which is the required
/// behavior when carrier credentials are absent from the environment.
pub struct GatewayBuilder {
    transport: Option<Arc<dyn DynTransport>>,
    config: GatewayConfig,
}

impl GatewayBuilder {
    /// Create a builder with default configuration and no transport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: None,
            config: GatewayConfig::default(),
        }
    }

    /// Set the carrier transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn DynTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the builder and wire up a [`Gateway`].
    #[must_use]
    pub fn build(self) -> Gateway {
        let tracker = Arc::new(RateWindowTracker::new(self.config.limits));
        let ledger = Arc::new(CostLedger::new());
        let registry = Arc::new(DeliveryRegistry::new(self.config.registry_capacity));
        let metrics = Arc::new(GatewayMetrics::default());

        let dispatcher = RetryingDispatcher::new(
            self.transport.clone(),
            self.config.from_address,
            self.config.retry,
            Arc::clone(&tracker),
            Arc::clone(&ledger),
            Arc::clone(&registry),
            Arc::clone(&metrics),
        );

        Gateway {
            dispatcher,
            transport: self.transport,
            tracker,
            ledger,
            registry,
            metrics,
            default_concurrency: self.config.default_concurrency,
            inter_chunk_delay: self.config.inter_chunk_delay,
        }
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
