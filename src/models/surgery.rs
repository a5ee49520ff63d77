//! Surgery (procedure) model.
//!
//! A surgery is one scheduled or in-progress procedure on the theatre
//! timeline, with its scheduling and delay metadata.
//!
//! # Wire Format
//!
//! Field names and enum values serialize in the REST collaborator's form:
//! camelCase fields (`startTime`, `delayDuration`) and kebab-case enum
//! values (`"in-progress"`, `"on-time"`).
//!
//! # Status Fields
//!
//! `status` is an independently stored lifecycle field. The authoritative
//! value for display is the position-derived status computed by the layout
//! engine; the two are never reconciled here.

use serde::{Deserialize, Serialize};

use crate::time::{time_to_minutes, TimeError};

/// Stored lifecycle state of a surgery.
///
/// Distinct from [`crate::layout::DerivedStatus`], which is computed from
/// the current-time cursor and owns display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurgeryStatus {
    /// Not yet started.
    #[default]
    Scheduled,
    /// Currently underway.
    InProgress,
    /// Finished.
    Completed,
}

/// Whether the surgery is running to plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    /// On schedule.
    #[default]
    OnTime,
    /// Extended past its nominal end.
    Delayed,
    /// Called off.
    Canceled,
}

/// Time-confidence classification of a surgery's slot.
///
/// Controls whether delay mutations are permitted: a `Locked` slot rejects
/// them (chief-surgeon override required).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeType {
    /// Fixed slot; delay mutations are rejected.
    Locked,
    /// Slot is a best estimate.
    Estimated,
    /// Slot floats with the day's schedule.
    #[default]
    Dynamic,
}

impl SurgeryStatus {
    /// Wire value of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurgeryStatus::Scheduled => "scheduled",
            SurgeryStatus::InProgress => "in-progress",
            SurgeryStatus::Completed => "completed",
        }
    }
}

impl ProgressStatus {
    /// Wire value of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::OnTime => "on-time",
            ProgressStatus::Delayed => "delayed",
            ProgressStatus::Canceled => "canceled",
        }
    }
}

impl TimeType {
    /// Wire value of this classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeType::Locked => "locked",
            TimeType::Estimated => "estimated",
            TimeType::Dynamic => "dynamic",
        }
    }
}

impl std::fmt::Display for SurgeryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for TimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled procedure on the theatre timeline.
///
/// Created either by the initial roster load or by the emergency-creation
/// operation. Mutated only through [`crate::ops::apply_delay`], which
/// produces a new value. Never deleted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    /// Unique identifier. Immutable after creation.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Wall-clock start, `"HH:MM"`.
    pub start_time: String,
    /// Wall-clock nominal end, `"HH:MM"`. Strictly after `start_time`.
    pub end_time: String,
    /// Stored lifecycle state.
    pub status: SurgeryStatus,
    /// Whether the surgery is running to plan.
    pub progress_status: ProgressStatus,
    /// Time-confidence classification of the slot.
    pub time_type: TimeType,
    /// Extension minutes appended to the nominal end. `None` = no delay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_duration: Option<i64>,
    /// Why the surgery was extended. Required whenever a delay is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_reason: Option<String>,
    /// Count of later surgeries pushed by this delay. Computed by a
    /// collaborator; consumed here as a display count only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstream_impacts: Option<i64>,
}

impl Surgery {
    /// Creates a surgery with the given id and time slot.
    ///
    /// Defaults: `Scheduled`, `OnTime`, `Dynamic`, no delay.
    pub fn new(
        id: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            status: SurgeryStatus::default(),
            progress_status: ProgressStatus::default(),
            time_type: TimeType::default(),
            delay_duration: None,
            delay_reason: None,
            downstream_impacts: None,
        }
    }

    /// Sets the display name.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the stored lifecycle state.
    pub fn with_status(mut self, status: SurgeryStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the progress classification.
    pub fn with_progress(mut self, progress: ProgressStatus) -> Self {
        self.progress_status = progress;
        self
    }

    /// Sets the time-confidence classification.
    pub fn with_time_type(mut self, time_type: TimeType) -> Self {
        self.time_type = time_type;
        self
    }

    /// Sets a delay extension and its reason.
    pub fn with_delay(mut self, minutes: i64, reason: impl Into<String>) -> Self {
        self.delay_duration = Some(minutes);
        self.delay_reason = Some(reason.into());
        self
    }

    /// Sets the downstream-impact display count.
    pub fn with_downstream_impacts(mut self, count: i64) -> Self {
        self.downstream_impacts = Some(count);
        self
    }

    /// Whether delay mutations are permitted on this surgery.
    pub fn is_mutable(&self) -> bool {
        self.time_type != TimeType::Locked
    }

    /// Delay extension in minutes (0 when no delay is set).
    #[inline]
    pub fn delay_minutes(&self) -> i64 {
        self.delay_duration.unwrap_or(0)
    }

    /// Nominal duration (end - start) in minutes.
    pub fn planned_minutes(&self) -> Result<i64, TimeError> {
        Ok(time_to_minutes(&self.end_time)? - time_to_minutes(&self.start_time)?)
    }

    /// Nominal duration plus any delay extension, in minutes.
    ///
    /// This is the figure the timeline block labels.
    pub fn total_minutes(&self) -> Result<i64, TimeError> {
        Ok(self.planned_minutes()? + self.delay_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surgery_builder() {
        let surgery = Surgery::new("2", "12:00", "13:30")
            .with_title("Hip Replacement")
            .with_status(SurgeryStatus::InProgress)
            .with_progress(ProgressStatus::Delayed)
            .with_time_type(TimeType::Estimated)
            .with_delay(30, "Equipment setup")
            .with_downstream_impacts(2);

        assert_eq!(surgery.id, "2");
        assert_eq!(surgery.title, "Hip Replacement");
        assert_eq!(surgery.status, SurgeryStatus::InProgress);
        assert_eq!(surgery.progress_status, ProgressStatus::Delayed);
        assert_eq!(surgery.time_type, TimeType::Estimated);
        assert_eq!(surgery.delay_duration, Some(30));
        assert_eq!(surgery.delay_reason.as_deref(), Some("Equipment setup"));
        assert_eq!(surgery.downstream_impacts, Some(2));
    }

    #[test]
    fn test_defaults() {
        let surgery = Surgery::new("1", "07:00", "11:30");
        assert_eq!(surgery.status, SurgeryStatus::Scheduled);
        assert_eq!(surgery.progress_status, ProgressStatus::OnTime);
        assert_eq!(surgery.time_type, TimeType::Dynamic);
        assert_eq!(surgery.delay_minutes(), 0);
        assert!(surgery.delay_reason.is_none());
    }

    #[test]
    fn test_is_mutable() {
        let dynamic = Surgery::new("1", "07:00", "08:00");
        let estimated = Surgery::new("2", "07:00", "08:00").with_time_type(TimeType::Estimated);
        let locked = Surgery::new("3", "07:00", "08:00").with_time_type(TimeType::Locked);

        assert!(dynamic.is_mutable());
        assert!(estimated.is_mutable());
        assert!(!locked.is_mutable());
    }

    #[test]
    fn test_durations() {
        let surgery = Surgery::new("1", "09:00", "10:30").with_delay(30, "Complication");
        assert_eq!(surgery.planned_minutes().unwrap(), 90);
        assert_eq!(surgery.total_minutes().unwrap(), 120);
    }

    #[test]
    fn test_wire_field_names() {
        let surgery = Surgery::new("1", "07:00", "11:30")
            .with_title("Appendectomy")
            .with_status(SurgeryStatus::InProgress)
            .with_progress(ProgressStatus::OnTime);

        let json = serde_json::to_value(&surgery).unwrap();
        assert_eq!(json["startTime"], "07:00");
        assert_eq!(json["endTime"], "11:30");
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["progressStatus"], "on-time");
        assert_eq!(json["timeType"], "dynamic");
        // Absent optionals stay off the wire
        assert!(json.get("delayDuration").is_none());
    }

    #[test]
    fn test_wire_round_trip() {
        let json = r#"{
            "id": "2",
            "title": "Hip Replacement",
            "startTime": "12:00",
            "endTime": "13:30",
            "status": "in-progress",
            "progressStatus": "delayed",
            "delayReason": "Equipment setup",
            "delayDuration": 30,
            "timeType": "estimated",
            "downstreamImpacts": 2
        }"#;

        let surgery: Surgery = serde_json::from_str(json).unwrap();
        assert_eq!(surgery.time_type, TimeType::Estimated);
        assert_eq!(surgery.delay_duration, Some(30));

        let back: Surgery =
            serde_json::from_str(&serde_json::to_string(&surgery).unwrap()).unwrap();
        assert_eq!(back, surgery);
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(SurgeryStatus::InProgress.as_str(), "in-progress");
        assert_eq!(ProgressStatus::OnTime.as_str(), "on-time");
        assert_eq!(ProgressStatus::Canceled.as_str(), "canceled");
        assert_eq!(TimeType::Locked.as_str(), "locked");
        assert_eq!(TimeType::Dynamic.to_string(), "dynamic");
    }
}
