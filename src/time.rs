//! Wall-clock time arithmetic.
//!
//! Converts between `"HH:MM"` wall-clock strings and integer
//! minutes-since-midnight. Every layout and mutation computation in this
//! crate goes through these functions.
//!
//! # Wire Format
//!
//! Times are exchanged as `"HH:MM"` strings, 24-hour clock, interpreted
//! within a single scheduling day. Hours are unbounded non-negative
//! integers so additive extensions can spill past midnight (`"25:30"` is
//! 1530 minutes); minutes must be exactly two digits in `00..=59`.
//!
//! # Round Trip
//!
//! `minutes_to_time(time_to_minutes(t)?)? == t` for every canonical
//! (zero-padded) string `t`.

use thiserror::Error;

/// Errors from wall-clock parsing and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Input does not match the `"HH:MM"` wire format.
    #[error("malformed clock time {0:?}: expected \"HH:MM\"")]
    Parse(String),
    /// A minutes-since-midnight value with no clock representation.
    #[error("minute value {0} is out of range")]
    Range(i64),
}

/// Parses an `"HH:MM"` string into minutes since midnight.
///
/// Hours may exceed 23 (next-day semantics); minutes must be two digits
/// in `00..=59`. Anything else fails with [`TimeError::Parse`].
pub fn time_to_minutes(time: &str) -> Result<i64, TimeError> {
    let malformed = || TimeError::Parse(time.to_string());

    let (hours_part, minutes_part) = time.split_once(':').ok_or_else(malformed)?;
    if hours_part.is_empty() || !hours_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    if minutes_part.len() != 2 || !minutes_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let hours: i64 = hours_part.parse().map_err(|_| malformed())?;
    let minutes: i64 = minutes_part.parse().map_err(|_| malformed())?;
    if minutes > 59 {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

/// Formats minutes since midnight as a zero-padded `"HH:MM"` string.
///
/// Negative input has no clock representation and fails with
/// [`TimeError::Range`].
pub fn minutes_to_time(minutes: i64) -> Result<String, TimeError> {
    if minutes < 0 {
        return Err(TimeError::Range(minutes));
    }
    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Adds `delta` minutes to an `"HH:MM"` string.
///
/// `delta` may be negative (a correction) as long as the result stays
/// non-negative.
pub fn add_minutes_to_time(time: &str, delta: i64) -> Result<String, TimeError> {
    minutes_to_time(time_to_minutes(time)? + delta)
}

/// Renders a minute count the way the timeline blocks label durations:
/// `90 → "1h30"`, `120 → "2h"`, `45 → "45min"`.
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 && mins > 0 {
        format!("{hours}h{mins}")
    } else if hours > 0 {
        format!("{hours}h")
    } else {
        format!("{mins}min")
    }
}
