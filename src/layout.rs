//! Timeline layout engine.
//!
//! Maps a surgery roster plus a [`ScheduleWindow`] into absolute vertical
//! offsets and heights for each surgery block and its delay extension,
//! and derives a live status from a current-time cursor.
//!
//! # Purity
//!
//! The engine is a pure function of its inputs. The current-time cursor
//! arrives as `current_offset`, a position on the same vertical axis,
//! supplied by the caller ([`ScheduleWindow::offset_for_now`] converts
//! wall-clock minutes for it). The derived status never mutates a
//! surgery's stored `status` field.
//!
//! # Overlap
//!
//! Blocks whose time ranges overlap are laid out independently and layer
//! over one another. Overlap detection and resolution belong to the
//! surrounding scheduling collaborator, not this engine.

use crate::models::{ScheduleWindow, Surgery};
use crate::time::{time_to_minutes, TimeError};

/// Live status of a block relative to the current-time cursor.
///
/// Computed from position only; authoritative for display. The surgery's
/// stored [`crate::models::SurgeryStatus`] is a separate lifecycle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedStatus {
    /// The cursor has not reached the block.
    Scheduled,
    /// The cursor is within the block's nominal span.
    InProgress,
    /// The cursor has passed the block's nominal end.
    Completed,
}

impl DerivedStatus {
    /// Wire/display value of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedStatus::Scheduled => "scheduled",
            DerivedStatus::InProgress => "in-progress",
            DerivedStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed geometry and live status for one surgery block.
///
/// All vertical values are in the window's layout units, measured from
/// the window start.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBlock {
    /// Id of the surgery this block positions.
    pub surgery_id: String,
    /// Top edge of the block.
    pub top_offset: f64,
    /// Height of the nominal (start..end) span.
    pub base_height: f64,
    /// Height of the delay extension below the nominal span.
    pub delay_height: f64,
    /// Bottom edge of the nominal span (`top_offset + base_height`).
    /// The delay extension hangs below this edge.
    pub bottom_offset: f64,
    /// Nominal plus delay height.
    pub total_height: f64,
    /// Live status at the cursor the layout was computed with.
    pub derived_status: DerivedStatus,
}

impl LayoutBlock {
    /// Recomputes the live status for a different cursor position.
    ///
    /// In progress while the cursor sits within the nominal span
    /// (bounds inclusive; the delay extension does not count), completed
    /// once the cursor has passed the nominal end.
    pub fn status_at(&self, current_offset: f64) -> DerivedStatus {
        if current_offset >= self.top_offset && current_offset <= self.bottom_offset {
            DerivedStatus::InProgress
        } else if current_offset > self.bottom_offset {
            DerivedStatus::Completed
        } else {
            DerivedStatus::Scheduled
        }
    }

    /// Whether the block carries a visible delay extension.
    pub fn has_delay(&self) -> bool {
        self.delay_height > 0.0
    }
}

/// A complete laid-out timeline.
///
/// Blocks are in roster order; overlapping blocks are both present.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    /// One block per surgery, in input order.
    pub blocks: Vec<LayoutBlock>,
    /// Full canvas height in layout units.
    pub calendar_height: f64,
    /// The cursor position the layout was computed with.
    pub current_offset: f64,
}

impl TimelineLayout {
    /// Finds the block for a given surgery.
    pub fn block_for(&self, surgery_id: &str) -> Option<&LayoutBlock> {
        self.blocks.iter().find(|b| b.surgery_id == surgery_id)
    }

    /// Number of blocks with the given live status.
    pub fn count_with_status(&self, status: DerivedStatus) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.derived_status == status)
            .count()
    }
}

/// Positions one surgery within the window.
pub fn layout_block(
    surgery: &Surgery,
    window: &ScheduleWindow,
    current_offset: f64,
) -> Result<LayoutBlock, TimeError> {
    let start = time_to_minutes(&surgery.start_time)?;
    let end = time_to_minutes(&surgery.end_time)?;
    let window_start = window.start_minutes()?;

    let scale = window.hour_height / 60.0;
    let top_offset = (start - window_start) as f64 * scale;
    let base_height = (end - start) as f64 * scale;
    let delay_height = surgery.delay_minutes() as f64 * scale;
    let bottom_offset = top_offset + base_height;

    let mut block = LayoutBlock {
        surgery_id: surgery.id.clone(),
        top_offset,
        base_height,
        delay_height,
        bottom_offset,
        total_height: base_height + delay_height,
        derived_status: DerivedStatus::Scheduled,
    };
    block.derived_status = block.status_at(current_offset);
    Ok(block)
}

/// Lays out a full roster.
///
/// Fails on the first surgery whose times do not parse; run
/// [`crate::validation::validate_roster`] upstream to surface all such
/// defects at once.
pub fn layout_surgeries(
    surgeries: &[Surgery],
    window: &ScheduleWindow,
    current_offset: f64,
) -> Result<TimelineLayout, TimeError> {
    let blocks = surgeries
        .iter()
        .map(|s| layout_block(s, window, current_offset))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TimelineLayout {
        blocks,
        calendar_height: window.calendar_height()?,
        current_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SurgeryStatus;

    fn window() -> ScheduleWindow {
        ScheduleWindow::new("07:00", "19:00", 60.0)
    }

    #[test]
    fn test_block_geometry() {
        let surgery = Surgery::new("1", "09:00", "10:30");
        let block = layout_block(&surgery, &window(), 0.0).unwrap();

        assert!((block.top_offset - 120.0).abs() < 1e-10);
        assert!((block.base_height - 90.0).abs() < 1e-10);
        assert!((block.delay_height - 0.0).abs() < 1e-10);
        assert!((block.bottom_offset - 210.0).abs() < 1e-10);
        assert!((block.total_height - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_delay_extension_geometry() {
        let surgery = Surgery::new("1", "09:00", "10:30").with_delay(30, "Complication");
        let block = layout_block(&surgery, &window(), 0.0).unwrap();

        assert!((block.delay_height - 30.0).abs() < 1e-10);
        assert!((block.total_height - 120.0).abs() < 1e-10);
        // The nominal bottom edge ignores the extension
        assert!((block.bottom_offset - 210.0).abs() < 1e-10);
        assert!(block.has_delay());
    }

    #[test]
    fn test_derived_status_from_cursor() {
        let surgery = Surgery::new("1", "09:00", "10:30");

        let block = layout_block(&surgery, &window(), 150.0).unwrap();
        assert_eq!(block.derived_status, DerivedStatus::InProgress);

        let block = layout_block(&surgery, &window(), 250.0).unwrap();
        assert_eq!(block.derived_status, DerivedStatus::Completed);

        let block = layout_block(&surgery, &window(), 50.0).unwrap();
        assert_eq!(block.derived_status, DerivedStatus::Scheduled);
    }

    #[test]
    fn test_derived_status_bounds_inclusive() {
        let surgery = Surgery::new("1", "09:00", "10:30");
        let block = layout_block(&surgery, &window(), 0.0).unwrap();

        assert_eq!(block.status_at(120.0), DerivedStatus::InProgress);
        assert_eq!(block.status_at(210.0), DerivedStatus::InProgress);
        assert_eq!(block.status_at(210.1), DerivedStatus::Completed);
        assert_eq!(block.status_at(119.9), DerivedStatus::Scheduled);
    }

    #[test]
    fn test_delay_does_not_extend_in_progress_span() {
        let surgery = Surgery::new("1", "09:00", "10:30").with_delay(60, "Complication");
        let block = layout_block(&surgery, &window(), 0.0).unwrap();

        // Cursor inside the delay extension counts as completed
        assert_eq!(block.status_at(240.0), DerivedStatus::Completed);
    }

    #[test]
    fn test_derived_status_leaves_stored_status_alone() {
        let surgery = Surgery::new("1", "09:00", "10:30");
        let block = layout_block(&surgery, &window(), 150.0).unwrap();

        assert_eq!(block.derived_status, DerivedStatus::InProgress);
        assert_eq!(surgery.status, SurgeryStatus::Scheduled);
    }

    #[test]
    fn test_zero_duration_block() {
        let surgery = Surgery::new("1", "09:00", "09:00");
        let block = layout_block(&surgery, &window(), 0.0).unwrap();

        assert!((block.base_height - 0.0).abs() < 1e-10);
        assert!((block.top_offset - block.bottom_offset).abs() < 1e-10);
    }

    #[test]
    fn test_overlapping_blocks_layer_independently() {
        let roster = vec![
            Surgery::new("1", "09:00", "11:00"),
            Surgery::new("2", "10:00", "12:00"),
        ];
        let layout = layout_surgeries(&roster, &window(), 0.0).unwrap();

        assert_eq!(layout.blocks.len(), 2);
        let a = layout.block_for("1").unwrap();
        let b = layout.block_for("2").unwrap();
        assert!(b.top_offset < a.bottom_offset);
    }

    #[test]
    fn test_layout_roster() {
        let roster = vec![
            Surgery::new("1", "07:00", "11:30"),
            Surgery::new("2", "12:00", "13:30").with_delay(30, "Equipment setup"),
            Surgery::new("3", "14:00", "15:00"),
        ];
        // Cursor at 12:00 → 300 units past 07:00
        let layout = layout_surgeries(&roster, &window(), 300.0).unwrap();

        assert!((layout.calendar_height - 720.0).abs() < 1e-10);
        assert_eq!(layout.blocks[0].derived_status, DerivedStatus::Completed);
        assert_eq!(layout.blocks[1].derived_status, DerivedStatus::InProgress);
        assert_eq!(layout.blocks[2].derived_status, DerivedStatus::Scheduled);
        assert_eq!(layout.count_with_status(DerivedStatus::InProgress), 1);
        assert!(layout.block_for("missing").is_none());
    }

    #[test]
    fn test_block_order_follows_roster() {
        let roster = vec![
            Surgery::new("late", "14:00", "15:00"),
            Surgery::new("early", "08:00", "09:00"),
        ];
        let layout = layout_surgeries(&roster, &window(), 0.0).unwrap();
        assert_eq!(layout.blocks[0].surgery_id, "late");
        assert_eq!(layout.blocks[1].surgery_id, "early");
    }

    #[test]
    fn test_malformed_time_propagates() {
        let roster = vec![Surgery::new("1", "soon", "10:00")];
        assert!(layout_surgeries(&roster, &window(), 0.0).is_err());
    }

    #[test]
    fn test_half_scale_window() {
        let window = ScheduleWindow::new("07:00", "19:00", 30.0);
        let surgery = Surgery::new("1", "09:00", "10:30");
        let block = layout_block(&surgery, &window, 0.0).unwrap();

        assert!((block.top_offset - 60.0).abs() < 1e-10);
        assert!((block.base_height - 45.0).abs() < 1e-10);
    }
}
