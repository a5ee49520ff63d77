//! Delay and emergency mutation operations.
//!
//! Pure transforms plus validation: creating an ad-hoc emergency surgery
//! and applying a delay extension to an existing one. Persisting the
//! result and broadcasting the matching [`crate::models::DelayEvent`] are
//! collaborator responsibilities (see [`crate::session`]); the operations
//! here never touch a store or a channel.
//!
//! Every error's `Display` string is the actionable message surfaced at
//! the UI boundary.

use thiserror::Error;

use crate::models::Surgery;
use crate::time::{add_minutes_to_time, TimeError};

/// Errors from the mutation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// A required input field was left empty.
    #[error("please fill in the {0} field")]
    MissingField(&'static str),
    /// A duration or extension that must be positive was not.
    #[error("duration must be a positive number of minutes, got {0}")]
    NonPositiveDuration(i64),
    /// A delay was submitted without a reason.
    #[error("please provide a reason for the delay")]
    MissingReason,
    /// A delay mutation hit a locked surgery.
    #[error("surgery '{0}' is locked - contact the chief surgeon to override")]
    LockedSurgery(String),
    /// A wall-clock input did not parse.
    #[error(transparent)]
    Time(#[from] TimeError),
}

/// Input for the emergency-creation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyRequest {
    /// Display name of the procedure.
    pub title: String,
    /// Wall-clock start, `"HH:MM"`.
    pub start_time: String,
    /// Duration in minutes. Must be positive.
    pub duration_minutes: i64,
}

impl EmergencyRequest {
    /// Creates a request.
    pub fn new(
        title: impl Into<String>,
        start_time: impl Into<String>,
        duration_minutes: i64,
    ) -> Self {
        Self {
            title: title.into(),
            start_time: start_time.into(),
            duration_minutes,
        }
    }
}

/// Creates an ad-hoc emergency surgery.
///
/// Requires a non-blank title and start time and a positive duration.
/// The end time is `start + duration`; the fresh id is collision-resistant
/// within a session. Defaults: `Scheduled`, `OnTime`, `Dynamic`.
pub fn create_emergency_surgery(request: &EmergencyRequest) -> Result<Surgery, MutationError> {
    if request.title.trim().is_empty() {
        return Err(MutationError::MissingField("title"));
    }
    if request.start_time.trim().is_empty() {
        return Err(MutationError::MissingField("start time"));
    }
    if request.duration_minutes <= 0 {
        return Err(MutationError::NonPositiveDuration(request.duration_minutes));
    }

    let end_time = add_minutes_to_time(&request.start_time, request.duration_minutes)?;

    Ok(Surgery::new(emergency_id(), request.start_time.clone(), end_time)
        .with_title(request.title.clone()))
}

/// Applies a delay extension to a surgery.
///
/// Locked surgeries are rejected with [`MutationError::LockedSurgery`]
/// regardless of the other inputs - the caller must surface the override
/// requirement, never drop the attempt silently. Returns a **new**
/// surgery with the delay fields set and `progress_status` moved to
/// `Delayed`; every other field, including the nominal end time, is
/// unchanged, so callers can diff old against new for the notification
/// payload.
pub fn apply_delay(
    surgery: &Surgery,
    delay_minutes: i64,
    reason: &str,
) -> Result<Surgery, MutationError> {
    if !surgery.is_mutable() {
        return Err(MutationError::LockedSurgery(surgery.id.clone()));
    }
    if reason.trim().is_empty() {
        return Err(MutationError::MissingReason);
    }
    if delay_minutes <= 0 {
        return Err(MutationError::NonPositiveDuration(delay_minutes));
    }

    Ok(surgery
        .clone()
        .with_delay(delay_minutes, reason)
        .with_progress(crate::models::ProgressStatus::Delayed))
}

/// End time a surgery would have with `extra_minutes` appended.
///
/// The dialog's timeline preview; nothing is applied.
pub fn preview_end_time(surgery: &Surgery, extra_minutes: i64) -> Result<String, TimeError> {
    add_minutes_to_time(&surgery.end_time, extra_minutes)
}

/// Converts a predicted total duration (hours, from the opaque prediction
/// service) into a suggested extension in minutes: predicted minus the
/// nominal duration, rounded. Negative when the prediction undercuts the
/// plan; callers decide whether to offer such a correction.
pub fn suggest_delay_minutes(predicted_hours: f64, surgery: &Surgery) -> Result<i64, TimeError> {
    let planned = surgery.planned_minutes()?;
    Ok((predicted_hours * 60.0 - planned as f64).round() as i64)
}

fn emergency_id() -> String {
    // Millisecond stamp plus a random suffix so two creations within the
    // same millisecond stay distinct.
    format!(
        "emergency-{}-{:08x}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}
