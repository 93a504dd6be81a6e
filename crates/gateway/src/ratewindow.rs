use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);
const DAY: Duration = Duration::from_secs(86_400);

/// Send ceilings for the three rolling rate windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateWindowLimits {
    /// Maximum sends per minute.
    pub per_minute: u32,
    /// Maximum sends per hour.
    pub per_hour: u32,
    /// Maximum sends per day.
    pub per_day: u32,
}

impl Default for RateWindowLimits {
    fn default() -> Self {
        Self {
            per_minute: 100,
            per_hour: 3000,
            per_day: 50_000,
        }
    }
}

/// Result of one reservation attempt.
#[derive(Debug, Clone, Copy)]
pub struct Reservation {
    /// Whether the send is allowed. When `false`, no counter was incremented.
    pub allowed: bool,
    /// Whether the day window rolled over since the previous reservation,
    /// whether this attempt rolled it or an intervening snapshot did. The
    /// gateway uses this to reset the cost ledger's daily bucket.
    pub day_rolled: bool,
}

/// Point-in-time view of the three window counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateWindowSnapshot {
    /// Sends counted in the current minute window.
    pub per_minute: u32,
    /// Sends counted in the current hour window.
    pub per_hour: u32,
    /// Sends counted in the current day window.
    pub per_day: u32,
    /// `true` when at least one counter has reached its ceiling.
    pub throttled: bool,
}

#[derive(Debug)]
struct Window {
    count: u32,
    started: Instant,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self { count: 0, started: now }
    }

    /// Zero the counter and restamp the start if the period has elapsed.
    /// Returns `true` if the window rolled.
    fn roll(&mut self, now: Instant, period: Duration) -> bool {
        if now.duration_since(self.started) >= period {
            self.count = 0;
            self.started = now;
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
struct WindowState {
    minute: Window,
    hour: Window,
    day: Window,
    /// Set when a snapshot rolls the day window; consumed by the next
    /// reservation so the rollover signal survives interleaved status
    /// polls.
    day_roll_pending: bool,
}

/// Fixed-window rate limiter over three independent time horizons.
///
/// This is the single serialization point shared by all concurrent senders:
/// a reservation either increments all three counters atomically or none of
/// them. Windows are rolled lazily on the next reservation attempt after
/// their period elapses; there is no background timer.
///
/// No queuing or backoff is implemented here. A denied reservation is an
/// immediate, retryable failure for the caller to handle.
#[derive(Debug)]
pub struct RateWindowTracker {
    limits: RateWindowLimits,
    state: Mutex<WindowState>,
}

impl RateWindowTracker {
    /// Create a tracker with the given ceilings and all counters at zero.
    #[must_use]
    pub fn new(limits: RateWindowLimits) -> Self {
        let now = Instant::now();
        Self {
            limits,
            state: Mutex::new(WindowState {
                minute: Window::new(now),
                hour: Window::new(now),
                day: Window::new(now),
                day_roll_pending: false,
            }),
        }
    }

    /// Return the configured ceilings.
    pub fn limits(&self) -> RateWindowLimits {
        self.limits
    }

    /// Attempt to reserve one send.
    ///
    /// Rolls any expired window first, then refuses (without incrementing)
    /// if any counter is already at its ceiling. Otherwise increments all
    /// three counters and grants the reservation.
    pub fn try_reserve(&self) -> Reservation {
        let now = Instant::now();
        let mut state = self.state.lock().expect("rate window lock poisoned");

        state.minute.roll(now, MINUTE);
        state.hour.roll(now, HOUR);
        let rolled_now = state.day.roll(now, DAY);
        let day_rolled = std::mem::take(&mut state.day_roll_pending) || rolled_now;

        let allowed = state.minute.count < self.limits.per_minute
            && state.hour.count < self.limits.per_hour
            && state.day.count < self.limits.per_day;

        if allowed {
            state.minute.count += 1;
            state.hour.count += 1;
            state.day.count += 1;
        }

        Reservation { allowed, day_rolled }
    }

    /// Return `true` when at least one window is currently at its ceiling.
    ///
    /// Rolls expired windows first, so a stale counter never reports the
    /// tracker as throttled.
    pub fn is_throttled(&self) -> bool {
        self.snapshot().throttled
    }

    /// Take a point-in-time snapshot of the three counters.
    ///
    /// A day-window rollover observed here is remembered and reported by
    /// the next [`try_reserve`](Self::try_reserve), so a status poll never
    /// swallows the signal that drives the daily cost reset.
    pub fn snapshot(&self) -> RateWindowSnapshot {
        let now = Instant::now();
        let mut state = self.state.lock().expect("rate window lock poisoned");

        state.minute.roll(now, MINUTE);
        state.hour.roll(now, HOUR);
        if state.day.roll(now, DAY) {
            state.day_roll_pending = true;
        }

        RateWindowSnapshot {
            per_minute: state.minute.count,
            per_hour: state.hour.count,
            per_day: state.day.count,
            throttled: state.minute.count >= self.limits.per_minute
                || state.hour.count >= self.limits.per_hour
                || state.day.count >= self.limits.per_day,
        }
    }

    /// Shift every window start back by `delta`, as if that much time had
    /// passed. Test-only: lets window-rollover behavior run without waiting
    /// out real periods.
    #[cfg(test)]
    pub(crate) fn rewind(&self, delta: Duration) {
        let mut state = self.state.lock().expect("rate window lock poisoned");
        state.minute.started -= delta;
        state.hour.started -= delta;
        state.day.started -= delta;
    }
}

impl Default for RateWindowTracker {
    fn default() -> Self {
        Self::new(RateWindowLimits::default())
    }
}
