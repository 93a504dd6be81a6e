use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Atomic counters tracking gateway dispatch outcomes.
///
/// Counters use relaxed ordering for maximum throughput; only the
/// last-success/last-failure stamps take a mutex, off the counter hot path.
/// For a consistent point-in-time view, call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Total dispatch calls, including fail-fast rejections.
    attempts: AtomicU64,
    /// Dispatches that ended with a carrier-accepted message.
    successes: AtomicU64,
    /// Dispatches that ended in a failure outcome.
    failures: AtomicU64,
    /// Individual transport attempts that failed and consumed retry budget.
    retried_attempts: AtomicU64,
    /// Sum of measured dispatch latencies, for the running average.
    latency_total_ms: AtomicU64,
    /// Number of latency samples behind `latency_total_ms`.
    latency_samples: AtomicU64,
    stamps: Mutex<Stamps>,
}

#[derive(Debug, Default)]
struct Stamps {
    last_success_at: Option<DateTime<Utc>>,
    last_failure_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl GatewayMetrics {
    /// Count one dispatch call.
    pub fn increment_attempts(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one failed transport attempt that consumed retry budget.
    pub fn increment_retried(&self) {
        self.retried_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful dispatch and its measured latency.
    pub fn record_success(&self, latency: Duration) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
        let mut stamps = self.stamps.lock().expect("metrics lock poisoned");
        stamps.last_success_at = Some(Utc::now());
    }

    /// Record a failed dispatch, its measured latency, and the final error.
    pub fn record_failure(&self, latency: Duration, error: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
        let mut stamps = self.stamps.lock().expect("metrics lock poisoned");
        stamps.last_failure_at = Some(Utc::now());
        stamps.last_error = Some(error.to_owned());
    }

    fn record_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_total_ms.fetch_add(ms, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent point-in-time snapshot of all counters and stamps.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let samples = self.latency_samples.load(Ordering::Relaxed);
        #[allow(clippy::cast_precision_loss)]
        let average_latency_ms = if samples == 0 {
            0.0
        } else {
            self.latency_total_ms.load(Ordering::Relaxed) as f64 / samples as f64
        };

        let stamps = self.stamps.lock().expect("metrics lock poisoned");
        MetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            retried_attempts: self.retried_attempts.load(Ordering::Relaxed),
            average_latency_ms,
            last_success_at: stamps.last_success_at,
            last_failure_at: stamps.last_failure_at,
            last_error: stamps.last_error.clone(),
        }
    }
}

/// A plain data snapshot of [`GatewayMetrics`] at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total dispatch calls.
    pub attempts: u64,
    /// Dispatches the carrier accepted.
    pub successes: u64,
    /// Dispatches that ended in a failure outcome.
    pub failures: u64,
    /// Failed transport attempts that consumed retry budget.
    pub retried_attempts: u64,
    /// Running average dispatch latency in milliseconds.
    pub average_latency_ms: f64,
    /// When the most recent success completed.
    pub last_success_at: Option<DateTime<Utc>>,
    /// When the most recent failure completed.
    pub last_failure_at: Option<DateTime<Utc>>,
    /// Final error text of the most recent failure.
    pub last_error: Option<String>,
}
