//! # Rental Time
//!
//! Duration arithmetic for rental sessions.
//!
//! Committed durations are stored as whole seconds; elapsed, remaining and
//! overtime spans are milliseconds. Everything that depends on "now" takes it
//! as an argument, so none of this reads the wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{validate_duration_hours, ValidationResult};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const MILLIS_PER_HOUR: i64 = SECONDS_PER_HOUR * MILLIS_PER_SECOND;

// =============================================================================
// Rental Hours
// =============================================================================

/// A strictly positive rental duration, held as whole seconds.
///
/// Cashiers type hours (`1`, `2`, `1.5`); the engine converts once, at the
/// edge, via `round(hours * 3600)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RentalHours {
    seconds: i64,
}

impl RentalHours {
    /// Converts user-entered hours. Rejects zero, negative, NaN and infinite
    /// values, and anything that rounds to less than one second.
    ///
    /// ## Example
    /// ```rust
    /// use arcade_core::time::RentalHours;
    ///
    /// assert_eq!(RentalHours::from_hours(1.5).unwrap().seconds(), 5_400);
    /// assert!(RentalHours::from_hours(0.0).is_err());
    /// assert!(RentalHours::from_hours(-1.0).is_err());
    /// ```
    pub fn from_hours(hours: f64) -> ValidationResult<Self> {
        let seconds = validate_duration_hours(hours)?;
        Ok(RentalHours { seconds })
    }

    /// Whole hours. Zero is rejected like any other non-positive duration.
    pub fn from_whole_hours(hours: u32) -> ValidationResult<Self> {
        Self::from_hours(hours as f64)
    }

    #[inline]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    #[inline]
    pub const fn millis(&self) -> i64 {
        self.seconds * MILLIS_PER_SECOND
    }

    /// Fractional hours, for display only.
    pub fn hours(&self) -> f64 {
        self.seconds as f64 / SECONDS_PER_HOUR as f64
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Signed milliseconds from `from` to `to`.
#[inline]
pub fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds()
}

/// Whole hours covering `millis`, rounded up. Zero or negative spans are 0.
///
/// ```rust
/// use arcade_core::time::ceil_hours;
///
/// assert_eq!(ceil_hours(0), 0);
/// assert_eq!(ceil_hours(1), 1);
/// assert_eq!(ceil_hours(3_600_000), 1);
/// assert_eq!(ceil_hours(3_600_001), 2);
/// ```
pub fn ceil_hours(millis: i64) -> i64 {
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR
}

/// `HH:MM:SS` countdown. Zero and negative spans render as `00:00:00`.
///
/// ```rust
/// use arcade_core::time::format_countdown;
///
/// assert_eq!(format_countdown(3_661_999), "01:01:01");
/// assert_eq!(format_countdown(-5), "00:00:00");
/// ```
pub fn format_countdown(millis: i64) -> String {
    if millis <= 0 {
        return "00:00:00".to_string();
    }
    let total_seconds = millis / MILLIS_PER_SECOND;
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
