//! Wall-clock time helpers -- "HH:MM" strings to comparable minute offsets.
//!
//! Schedule events carry minute-granularity wall-clock times as strings.
//! Everything that compares times converts through [`to_minutes`] first so
//! that overlap checks reduce to integer comparisons.

use crate::error::{Result, TimetableError};
use chrono::{NaiveTime, Timelike};

/// Convert an "HH:MM" wall-clock string into minutes since midnight.
///
/// Accepts one- or two-digit hours ("9:05" and "09:05" are equivalent);
/// hours run 0-23 and minutes 0-59.
///
/// # Errors
/// Returns `TimetableError::InvalidTime` for anything that is not a valid
/// 24-hour wall-clock time (e.g. "24:00", "9:60", "noon").
pub fn to_minutes(time: &str) -> Result<u32> {
    // chrono is lenient about digit counts; minutes must be exactly two
    // digits ("9:5" is malformed even though "%H:%M" would take it).
    let well_shaped = matches!(
        time.split_once(':'),
        Some((h, m))
            if (1..=2).contains(&h.len())
                && m.len() == 2
                && h.bytes().all(|b| b.is_ascii_digit())
                && m.bytes().all(|b| b.is_ascii_digit())
    );
    if !well_shaped {
        return Err(TimetableError::InvalidTime(time.to_string()));
    }
    let parsed = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| TimetableError::InvalidTime(time.to_string()))?;
    Ok(parsed.hour() * 60 + parsed.minute())
}

/// Half-open interval overlap: `a_start < b_end && b_start < a_end`.
///
/// Back-to-back events (one ends exactly when the other starts) do NOT
/// overlap.
pub fn overlaps(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && b_start < a_end
}

/// Duration of a minute interval expressed in hours.
pub fn span_hours(start_min: u32, end_min: u32) -> f64 {
    (end_min as f64 - start_min as f64) / 60.0
}
