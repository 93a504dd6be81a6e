//! The Courier gateway: a resilient outbound notification dispatcher.
//!
//! The gateway wraps a carrier transport with the plumbing a production
//! sender needs:
//!
//! - three-horizon rate limiting ([`RateWindowTracker`]),
//! - retry with capped exponential backoff ([`RetryingDispatcher`]),
//! - running cost accounting ([`CostLedger`]),
//! - webhook-driven delivery reconciliation ([`DeliveryRegistry`]),
//! - bounded-concurrency batch dispatch,
//! - process-wide metrics and health reporting ([`GatewayMetrics`]).
//!
//! Construct one [`Gateway`] at process start via [`GatewayBuilder`] and
//! share it; all components are internally synchronized.

pub mod batch;
pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod metrics;
pub mod ratewindow;
pub mod registry;
pub mod retry;
pub mod status;
pub mod webhook;

pub use builder::GatewayBuilder;
pub use config::GatewayConfig;
pub use dispatcher::RetryingDispatcher;
pub use error::GatewayError;
pub use gateway::Gateway;
pub use ledger::{CostAnalysis, CostLedger, CostSnapshot};
pub use metrics::{GatewayMetrics, MetricsSnapshot};
pub use ratewindow::{RateWindowLimits, RateWindowSnapshot, RateWindowTracker, Reservation};
pub use registry::DeliveryRegistry;
pub use retry::RetryPolicy;
pub use status::{HealthReport, SystemStatus};
pub use webhook::DeliveryEvent;
