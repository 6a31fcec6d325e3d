//! Countdown alarms.
//!
//! A [`Timer`] is a labelled countdown anchored at a wall-clock start time.
//! Every time-dependent query has an `_at(now)` form so callers (and tests)
//! can pin the clock; the plain forms read [`Utc::now`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{TrackError, TrackResult};

/// A countdown alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    /// Unique timer ID.
    pub id: Uuid,
    /// Optional label shown when the alarm fires.
    pub label: Option<String>,
    /// When the countdown began.
    pub started_at: DateTime<Utc>,
    /// Total countdown length.
    pub duration: Duration,
}

impl Timer {
    /// Start a countdown now.
    pub fn new(duration: Duration, label: Option<String>) -> Self {
        Self::started(duration, label, Utc::now())
    }

    /// Create a countdown that began at `started_at`.
    pub fn started(duration: Duration, label: Option<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            started_at,
            duration,
        }
    }

    /// The instant the alarm fires.
    pub fn deadline(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.duration)
            .ok()
            .and_then(|d| self.started_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Time elapsed at `now`, clamped to `[0, duration]`.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
            .min(self.duration)
    }

    /// Time left at `now`, zero once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        self.duration.saturating_sub(self.elapsed_at(now))
    }

    /// Share of the countdown that has passed, from 0 to 100.
    pub fn percent_complete_at(&self, now: DateTime<Utc>) -> f64 {
        if self.duration.is_zero() {
            return 100.0;
        }
        let ratio = self.elapsed_at(now).as_secs_f64() / self.duration.as_secs_f64();
        (ratio * 100.0).min(100.0)
    }

    /// Whether the alarm has fired by `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.elapsed_at(now) >= self.duration
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Utc::now())
    }

    /// Time left right now.
    pub fn remaining(&self) -> Duration {
        self.remaining_at(Utc::now())
    }

    /// Share of the countdown that has passed so far.
    pub fn percent_complete(&self) -> f64 {
        self.percent_complete_at(Utc::now())
    }

    /// Whether the alarm has fired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Parse a duration such as `1h30m`, `5m`, `30s`, `1.5h` or `250ms`.
///
/// The input is a sequence of `<number><unit>` pairs with units `h`, `m`,
/// `s` and `ms`. Whitespace is ignored. The result must be positive.
pub fn parse_duration(input: &str) -> TrackResult<Duration> {
    let invalid = |reason: String| TrackError::InvalidDuration {
        input: input.to_string(),
        reason,
    };

    let text: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if text.is_empty() {
        return Err(invalid("empty duration".to_string()));
    }

    let mut seconds = 0.0_f64;
    let mut rest = text.as_str();
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return Err(invalid(format!("expected a number at '{rest}'")));
        }
        let (number, after) = rest.split_at(num_len);
        let value: f64 = number
            .parse()
            .map_err(|_| invalid(format!("bad number '{number}'")))?;

        let unit_len = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        let scale = match unit {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 0.001,
            "" => return Err(invalid(format!("missing unit after '{number}'"))),
            other => return Err(invalid(format!("unknown unit '{other}'"))),
        };
        seconds += value * scale;
        rest = after;
    }

    if seconds <= 0.0 {
        return Err(invalid("must be positive".to_string()));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| invalid(e.to_string()))
}

fn split_hms(d: Duration) -> (u128, u128, u128) {
    let secs = (d.as_millis() + 500) / 1000;
    (secs / 3600, secs % 3600 / 60, secs % 60)
}

/// Format as `1h2m3s`, `4m5s` or `6s`, rounded to whole seconds.
pub fn format_duration(d: Duration) -> String {
    match split_hms(d) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m{s}s"),
        (h, m, s) => format!("{h}h{m}m{s}s"),
    }
}

/// Like [`format_duration`] but drops seconds once hours are shown.
pub fn format_duration_short(d: Duration) -> String {
    match split_hms(d) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m{s}s"),
        (h, m, _) => format!("{h}h{m}m"),
    }
}

/// Thread-safe collection of running alarms.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: RwLock<HashMap<Uuid, Timer>>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer, returning its ID.
    pub fn add(&self, timer: Timer) -> Uuid {
        let id = timer.id;
        debug!(%id, duration = ?timer.duration, "alarm added");
        self.timers.write().insert(id, timer);
        id
    }

    /// Remove a timer by ID.
    pub fn remove(&self, id: Uuid) -> Option<Timer> {
        self.timers.write().remove(&id)
    }

    /// Timers still running at `now`, soonest first.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Timer> {
        let mut active: Vec<Timer> = self
            .timers
            .read()
            .values()
            .filter(|t| !t.is_expired_at(now))
            .cloned()
            .collect();
        active.sort_by_key(|t| (t.remaining_at(now), t.started_at));
        active
    }

    /// Remove and return every timer expired at `now`, in firing order.
    pub fn pop_expired_at(&self, now: DateTime<Utc>) -> Vec<Timer> {
        let mut timers = self.timers.write();
        let ids: Vec<Uuid> = timers
            .values()
            .filter(|t| t.is_expired_at(now))
            .map(|t| t.id)
            .collect();
        let mut expired: Vec<Timer> = ids.iter().filter_map(|id| timers.remove(id)).collect();
        expired.sort_by_key(|t| (t.deadline(), t.started_at));
        if !expired.is_empty() {
            debug!(count = expired.len(), "alarms expired");
        }
        expired
    }

    /// Number of timers held, expired ones included.
    pub fn count(&self) -> usize {
        self.timers.read().len()
    }

    /// Number of timers still running at `now`.
    pub fn active_count_at(&self, now: DateTime<Utc>) -> usize {
        self.timers
            .read()
            .values()
            .filter(|t| !t.is_expired_at(now))
            .count()
    }

    /// Drop every timer.
    pub fn clear(&self) {
        self.timers.write().clear();
    }

    /// Timers still running, soonest first.
    pub fn active(&self) -> Vec<Timer> {
        self.active_at(Utc::now())
    }

    /// Remove and return every expired timer.
    pub fn pop_expired(&self) -> Vec<Timer> {
        self.pop_expired_at(Utc::now())
    }

    /// Number of timers still running.
    pub fn active_count(&self) -> usize {
        self.active_count_at(Utc::now())
    }
}
