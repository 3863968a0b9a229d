//! Reporting time window
//!
//! A timestamp is inside the window when it is at most `days` old, boundary
//! included. Timestamps in the future count as inside.

use chrono::{DateTime, Duration, Utc};

/// Window of the last `days` days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    days: u32,
}

impl TimeWindow {
    /// Create a window; `days` must be greater than zero
    pub fn new(days: u32) -> Result<Self, WindowError> {
        if days == 0 {
            return Err(WindowError::ZeroDays);
        }
        Ok(Self { days })
    }

    /// Window length in days
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Oldest instant still inside the window, relative to `now`
    ///
    /// Windows reaching past the earliest representable instant start there.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether `updated_at` is inside the window as seen at `now`
    pub fn contains_at(&self, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        updated_at >= self.cutoff(now)
    }

    /// Whether `updated_at` is inside the window as of the current time
    pub fn contains(&self, updated_at: DateTime<Utc>) -> bool {
        self.contains_at(updated_at, Utc::now())
    }
}

/// Decide whether a record updated at `updated_at` falls inside the last `days` days
pub fn in_window(updated_at: DateTime<Utc>, days: u32) -> bool {
    TimeWindow { days }.contains(updated_at)
}

/// Invalid window size
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("timedelta must be at least 1 day")]
    ZeroDays,
}
