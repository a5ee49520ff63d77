//! Day-summary metrics.
//!
//! Computes the display figures the schedule header shows from a roster
//! and its laid-out timeline. Pure reporting; no optimization and no
//! recomputation of downstream impacts (those arrive on the surgeries
//! from a collaborator).

use crate::layout::{DerivedStatus, TimelineLayout};
use crate::models::{ScheduleWindow, Surgery};
use crate::time::TimeError;

/// Summary figures for one scheduling day.
///
/// All durations are in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct DayStats {
    /// Sum of nominal surgery durations.
    pub scheduled_minutes: i64,
    /// Sum of delay extensions.
    pub delay_minutes: i64,
    /// Number of surgeries carrying a delay.
    pub delayed_count: usize,
    /// Sum of reported downstream-impact counts.
    pub downstream_impacts: i64,
    /// Occupied fraction of the window (nominal + delay over window
    /// span). Can exceed 1.0 when blocks overlap.
    pub occupancy: f64,
    /// Blocks not yet reached by the cursor.
    pub scheduled_count: usize,
    /// Blocks the cursor is inside.
    pub in_progress_count: usize,
    /// Blocks the cursor has passed.
    pub completed_count: usize,
}

impl DayStats {
    /// Computes the summary for a roster and its layout.
    ///
    /// # Arguments
    /// * `surgeries` - The roster the layout was computed from.
    /// * `layout` - The laid-out timeline (for live-status counts).
    /// * `window` - The day's window (for the occupancy denominator).
    pub fn calculate(
        surgeries: &[Surgery],
        layout: &TimelineLayout,
        window: &ScheduleWindow,
    ) -> Result<Self, TimeError> {
        let mut scheduled_minutes: i64 = 0;
        let mut delay_minutes: i64 = 0;
        let mut delayed_count: usize = 0;
        let mut downstream_impacts: i64 = 0;

        for surgery in surgeries {
            scheduled_minutes += surgery.planned_minutes()?;
            let delay = surgery.delay_minutes();
            if delay > 0 {
                delayed_count += 1;
                delay_minutes += delay;
            }
            downstream_impacts += surgery.downstream_impacts.unwrap_or(0);
        }

        let span = window.total_minutes()?;
        let occupancy = if span > 0 {
            (scheduled_minutes + delay_minutes) as f64 / span as f64
        } else {
            0.0
        };

        Ok(Self {
            scheduled_minutes,
            delay_minutes,
            delayed_count,
            downstream_impacts,
            occupancy,
            scheduled_count: layout.count_with_status(DerivedStatus::Scheduled),
            in_progress_count: layout.count_with_status(DerivedStatus::InProgress),
            completed_count: layout.count_with_status(DerivedStatus::Completed),
        })
    }
}
