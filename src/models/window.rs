//! Schedule window model.
//!
//! A [`ScheduleWindow`] is the layout configuration for one scheduling
//! day: the visible wall-clock bounds and the vertical scale. It defines
//! the coordinate system every timeline block is positioned in. Not
//! persisted.

use serde::{Deserialize, Serialize};

use crate::time::{minutes_to_time, time_to_minutes, TimeError};

/// An hour grid line: vertical offset plus its `"HH:00"` label.
#[derive(Debug, Clone, PartialEq)]
pub struct HourMark {
    /// Vertical offset in layout units.
    pub offset: f64,
    /// Wall-clock label, e.g. `"07:00"`.
    pub label: String,
}

/// Layout configuration: wall-clock bounds plus pixels-per-hour.
///
/// `hour_height` is in whatever linear unit the consumer renders with;
/// the engine only requires it to be positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    /// Window start, `"HH:MM"`.
    pub start: String,
    /// Window end, `"HH:MM"`. Strictly after `start`.
    pub end: String,
    /// Vertical units per hour.
    pub hour_height: f64,
}

impl ScheduleWindow {
    /// Creates a window with the given bounds and scale.
    pub fn new(start: impl Into<String>, end: impl Into<String>, hour_height: f64) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            hour_height,
        }
    }

    /// Window start in minutes since midnight.
    pub fn start_minutes(&self) -> Result<i64, TimeError> {
        time_to_minutes(&self.start)
    }

    /// Window end in minutes since midnight.
    pub fn end_minutes(&self) -> Result<i64, TimeError> {
        time_to_minutes(&self.end)
    }

    /// Minutes covered by the window.
    pub fn total_minutes(&self) -> Result<i64, TimeError> {
        Ok(self.end_minutes()? - self.start_minutes()?)
    }

    /// Full height of the timeline canvas in layout units.
    pub fn calendar_height(&self) -> Result<f64, TimeError> {
        Ok(self.total_minutes()? as f64 / 60.0 * self.hour_height)
    }

    /// Vertical offset of a minutes-since-midnight instant.
    ///
    /// Instants before the window start map to negative offsets; the
    /// engine does not clamp.
    pub fn offset_of(&self, minutes: i64) -> Result<f64, TimeError> {
        Ok((minutes - self.start_minutes()?) as f64 / 60.0 * self.hour_height)
    }

    /// Offset for the current-time indicator.
    ///
    /// `Some(offset)` when `now_minutes` falls within the window bounds
    /// (inclusive), `None` when the indicator should not be drawn.
    pub fn offset_for_now(&self, now_minutes: i64) -> Result<Option<f64>, TimeError> {
        if now_minutes >= self.start_minutes()? && now_minutes <= self.end_minutes()? {
            Ok(Some(self.offset_of(now_minutes)?))
        } else {
            Ok(None)
        }
    }

    /// Hour grid lines from the window start to its end, one per hour.
    pub fn hour_marks(&self) -> Result<Vec<HourMark>, TimeError> {
        let start = self.start_minutes()?;
        let end = self.end_minutes()?;
        let mut marks = Vec::new();
        let mut minutes = start;
        let mut i = 0;
        while minutes <= end {
            marks.push(HourMark {
                offset: i as f64 * self.hour_height,
                label: minutes_to_time(minutes)?,
            });
            minutes += 60;
            i += 1;
        }
        Ok(marks)
    }
}

impl Default for ScheduleWindow {
    /// The standard theatre day: 07:00-19:00 at 60 units per hour.
    fn default() -> Self {
        Self::new("07:00", "19:00", 60.0)
    }
}
