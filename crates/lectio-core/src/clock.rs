//! Injectable time source and calendar-day arithmetic.
//!
//! Unlocks and streaks both work on calendar days, not elapsed hours:
//! a boundary crosses exactly at midnight. [`DayBoundary`] fixes which
//! midnight -- every timestamp is shifted by a single configured UTC
//! offset before its date is taken, so two processes with different
//! host time zones agree on the boundary.

use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Time source for the engine. Injectable so tests can steer the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock whose "now" is set by hand. Used by tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

/// Calendar-day conversion policy.
///
/// All day arithmetic in the engine goes through one of these, so the
/// unlock gate and the streak tracker can never disagree on what
/// "today" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    /// Midnight-UTC day boundaries.
    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0).unwrap(),
        }
    }

    /// Day boundaries shifted by a fixed offset from UTC, in minutes.
    ///
    /// Out-of-range offsets (beyond +/- 24h) fall back to UTC.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        match FixedOffset::east_opt(minutes * 60) {
            Some(offset) => Self { offset },
            None => Self::utc(),
        }
    }

    /// The calendar date a timestamp falls on under this boundary.
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Whole calendar days from `earlier` to `later`. Negative when
    /// `later` precedes `earlier`.
    pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
        (later - earlier).num_days()
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}
