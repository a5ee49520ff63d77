//! Delay notification wire message.
//!
//! The payload broadcast on the notification channel when a surgery is
//! extended. Addressing is advisory: the channel delivers every event to
//! every subscriber, and each subscriber filters on `receiver` itself.

use serde::{Deserialize, Serialize};

/// Receiver role for the patient-facing portal.
pub const RECEIVER_PATIENT: &str = "patient";

/// A delay broadcast to a named receiver role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayEvent {
    /// Role the event targets, e.g. `"patient"`.
    pub receiver: String,
    /// Id of the extended surgery.
    pub surgery_id: String,
    /// Extension in minutes. Optional on decode so receivers can treat
    /// an absent value as a no-op rather than an error.
    #[serde(default)]
    pub delay_minutes: Option<i64>,
    /// Why the surgery was extended.
    pub reason: String,
}

impl DelayEvent {
    /// Creates an event addressed to the given receiver role.
    pub fn new(
        receiver: impl Into<String>,
        surgery_id: impl Into<String>,
        delay_minutes: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            receiver: receiver.into(),
            surgery_id: surgery_id.into(),
            delay_minutes: Some(delay_minutes),
            reason: reason.into(),
        }
    }

    /// Creates an event addressed to the patient portal.
    pub fn for_patient(
        surgery_id: impl Into<String>,
        delay_minutes: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(RECEIVER_PATIENT, surgery_id, delay_minutes, reason)
    }

    /// Whether this event is addressed to the given role.
    pub fn is_for(&self, role: &str) -> bool {
        self.receiver == role
    }
}
