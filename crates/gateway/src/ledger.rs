use std::sync::Mutex;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsSnapshot;
use crate::ratewindow::RateWindowLimits;

/// Per-message price above which the analysis flags the account as paying
/// more than typical volume-tier rates.
const VOLUME_TIER_PRICE: f64 = 0.01;

/// Running cost accounting for all carrier-accepted messages.
///
/// Lifetime totals only ever grow; the day bucket is zeroed by
/// [`reset_daily`](Self::reset_daily) (driven by the day-window rollover) and
/// the month bucket resets itself when a record lands in a new calendar
/// month.
#[derive(Debug)]
pub struct CostLedger {
    state: Mutex<LedgerState>,
}

#[derive(Debug)]
struct LedgerState {
    total_messages: u64,
    total_cost: f64,
    daily_messages: u64,
    daily_cost: f64,
    monthly_cost: f64,
    average_cost: f64,
    last_reset: DateTime<Utc>,
    /// Calendar month of the last recorded cost, as (year, month).
    month: (i32, u32),
}

impl CostLedger {
    /// Create an empty ledger stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: Mutex::new(LedgerState {
                total_messages: 0,
                total_cost: 0.0,
                daily_messages: 0,
                daily_cost: 0.0,
                monthly_cost: 0.0,
                average_cost: 0.0,
                last_reset: now,
                month: (now.year(), now.month()),
            }),
        }
    }

    /// Record the cost of one accepted message.
    pub fn record(&self, cost: f64) {
        self.record_at(cost, Utc::now());
    }

    fn record_at(&self, cost: f64, now: DateTime<Utc>) {
        let mut state = self.state.lock().expect("cost ledger lock poisoned");

        state.total_messages += 1;
        state.total_cost += cost;
        state.daily_messages += 1;
        state.daily_cost += cost;

        let month = (now.year(), now.month());
        if month == state.month {
            state.monthly_cost += cost;
        } else {
            // Calendar month advanced: the bucket restarts at this cost.
            state.monthly_cost = cost;
            state.month = month;
        }

        #[allow(clippy::cast_precision_loss)]
        {
            state.average_cost = state.total_cost / state.total_messages as f64;
        }
    }

    /// Zero the day bucket. Invoked when the day rate window rolls over so
    /// the two daily resets stay aligned.
    pub fn reset_daily(&self) {
        let mut state = self.state.lock().expect("cost ledger lock poisoned");
        state.daily_messages = 0;
        state.daily_cost = 0.0;
        state.last_reset = Utc::now();
    }

    /// Take a point-in-time snapshot of the ledger.
    pub fn snapshot(&self) -> CostSnapshot {
        let state = self.state.lock().expect("cost ledger lock poisoned");
        CostSnapshot {
            total_messages: state.total_messages,
            total_cost: state.total_cost,
            daily_messages: state.daily_messages,
            daily_cost: state.daily_cost,
            monthly_cost: state.monthly_cost,
            average_cost: state.average_cost,
            last_reset: state.last_reset,
        }
    }

    /// Produce a cost report with projections and heuristic recommendations.
    ///
    /// Projections extrapolate the current day bucket (× 30 for a month,
    /// × 365 for a year). At most three recommendations are emitted: pricing
    /// above volume-tier rates, daily volume approaching the configured
    /// ceiling, and a failure rate worth investigating.
    pub fn analysis(&self, limits: RateWindowLimits, metrics: &MetricsSnapshot) -> CostAnalysis {
        let snapshot = self.snapshot();
        let mut recommendations = Vec::new();

        if snapshot.total_messages > 0 && snapshot.average_cost > VOLUME_TIER_PRICE {
            recommendations.push(format!(
                "average cost per message ({:.4}) is above typical volume-tier pricing; review the carrier plan",
                snapshot.average_cost
            ));
        }

        let daily_ceiling = u64::from(limits.per_day);
        if daily_ceiling > 0 && snapshot.daily_messages * 10 >= daily_ceiling * 8 {
            recommendations.push(format!(
                "daily volume ({} of {daily_ceiling}) is within 20% of the daily ceiling; consider raising the limit or spreading sends",
                snapshot.daily_messages
            ));
        }

        if metrics.failures * 10 > metrics.successes {
            recommendations.push(format!(
                "failure rate ({} failures / {} successes) exceeds 10%; investigate destination validation",
                metrics.failures, metrics.successes
            ));
        }

        CostAnalysis {
            projected_monthly_cost: snapshot.daily_cost * 30.0,
            projected_yearly_cost: snapshot.daily_cost * 365.0,
            snapshot,
            recommendations,
        }
    }
}

impl Default for CostLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the ledger's buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSnapshot {
    /// Messages accepted over the gateway's lifetime.
    pub total_messages: u64,
    /// Cost accumulated over the gateway's lifetime.
    pub total_cost: f64,
    /// Messages accepted in the current day bucket.
    pub daily_messages: u64,
    /// Cost accumulated in the current day bucket.
    pub daily_cost: f64,
    /// Cost accumulated in the current calendar month.
    pub monthly_cost: f64,
    /// Lifetime average cost per message.
    pub average_cost: f64,
    /// When the day bucket was last zeroed.
    pub last_reset: DateTime<Utc>,
}

/// Cost report with projections and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostAnalysis {
    /// Ledger state the report was derived from.
    pub snapshot: CostSnapshot,
    /// Current day bucket extrapolated to 30 days.
    pub projected_monthly_cost: f64,
    /// Current day bucket extrapolated to 365 days.
    pub projected_yearly_cost: f64,
    /// Up to three heuristic recommendations.
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn quiet_metrics() -> MetricsSnapshot {
        MetricsSnapshot {
            attempts: 0,
            successes: 0,
            failures: 0,
            retried_attempts: 0,
            average_latency_ms: 0.0,
            last_success_at: None,
            last_failure_at: None,
            last_error: None,
        }
    }

    #[test]
    fn record_accumulates_totals_and_average() {
        let ledger = CostLedger::new();
        for cost in [0.01, 0.02, 0.03] {
            ledger.record(cost);
        }
        let snap = ledger.snapshot();
        assert_eq!(snap.total_messages, 3);
        assert!((snap.total_cost - 0.06).abs() < 1e-9);
        assert!((snap.average_cost - 0.02).abs() < 1e-9);
        assert!((snap.daily_cost - 0.06).abs() < 1e-9);
        assert!((snap.monthly_cost - 0.06).abs() < 1e-9);
    }

    #[test]
    fn reset_daily_only_touches_day_bucket() {
        let ledger = CostLedger::new();
        ledger.record(0.05);
        ledger.reset_daily();

        let snap = ledger.snapshot();
        assert_eq!(snap.daily_messages, 0);
        assert!((snap.daily_cost - 0.0).abs() < f64::EPSILON);
        assert_eq!(snap.total_messages, 1);
        assert!((snap.total_cost - 0.05).abs() < 1e-9);
        assert!((snap.monthly_cost - 0.05).abs() < 1e-9);
    }

    #[test]
    fn month_boundary_restarts_month_bucket() {
        let ledger = CostLedger::new();
        let january = Utc.with_ymd_and_hms(2026, 1, 31, 23, 0, 0).unwrap();
        let february = Utc.with_ymd_and_hms(2026, 2, 1, 1, 0, 0).unwrap();

        ledger.record_at(0.10, january);
        ledger.record_at(0.10, january);
        ledger.record_at(0.03, february);

        let snap = ledger.snapshot();
        // Month bucket resets to the new cost, not accumulated across months.
        assert!((snap.monthly_cost - 0.03).abs() < 1e-9);
        assert!((snap.total_cost - 0.23).abs() < 1e-9);
    }

    #[test]
    fn analysis_projects_from_day_bucket() {
        let ledger = CostLedger::new();
        ledger.record(2.0);
        let analysis = ledger.analysis(RateWindowLimits::default(), &quiet_metrics());
        assert!((analysis.projected_monthly_cost - 60.0).abs() < 1e-9);
        assert!((analysis.projected_yearly_cost - 730.0).abs() < 1e-9);
    }

    #[test]
    fn analysis_flags_expensive_messages() {
        let ledger = CostLedger::new();
        ledger.record(0.05);
        let analysis = ledger.analysis(RateWindowLimits::default(), &quiet_metrics());
        assert!(
            analysis
                .recommendations
                .iter()
                .any(|r| r.contains("volume-tier pricing"))
        );
    }

    #[test]
    fn analysis_flags_daily_volume_near_ceiling() {
        let ledger = CostLedger::new();
        for _ in 0..8 {
            ledger.record(0.001);
        }
        let limits = RateWindowLimits {
            per_minute: 100,
            per_hour: 3000,
            per_day: 10,
        };
        let analysis = ledger.analysis(limits, &quiet_metrics());
        assert!(
            analysis
                .recommendations
                .iter()
                .any(|r| r.contains("daily ceiling"))
        );
    }

    #[test]
    fn analysis_flags_failure_rate() {
        let ledger = CostLedger::new();
        let metrics = MetricsSnapshot {
            successes: 50,
            failures: 6,
            ..quiet_metrics()
        };
        let analysis = ledger.analysis(RateWindowLimits::default(), &metrics);
        assert!(
            analysis
                .recommendations
                .iter()
                .any(|r| r.contains("failure rate"))
        );
    }

    #[test]
    fn analysis_quiet_system_has_no_recommendations() {
        let ledger = CostLedger::new();
        ledger.record(0.005);
        let analysis = ledger.analysis(RateWindowLimits::default(), &quiet_metrics());
        assert!(analysis.recommendations.is_empty());
    }
}
