//! Patient record wire types.
//!
//! Shapes returned by the REST collaborator's `GET /get_patient_data`.
//! The surgery time is kept as its raw string so the portal can apply the
//! defensive skip when the stored value fails to parse.

use serde::{Deserialize, Serialize};

use super::ProgressStatus;

/// A patient's scheduled surgery as the portal sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSurgery {
    /// Procedure name.
    #[serde(rename = "type")]
    pub procedure: String,
    /// Scheduled instant, RFC 3339. Kept raw; may be unparseable.
    pub time: String,
    /// Whether the surgery is running to plan.
    pub status: ProgressStatus,
}

/// One entry in the patient's activity log, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    /// Unique entry id (epoch milliseconds at creation).
    pub id: i64,
    /// What happened.
    pub action: String,
    /// Human-facing timestamp label.
    pub time: String,
}

impl ActionEntry {
    /// Creates a log entry.
    pub fn new(id: i64, action: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id,
            action: action.into(),
            time: time.into(),
        }
    }
}

/// The patient record served to the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Patient identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Phone contact.
    pub contact: String,
    /// Email contact.
    pub email: String,
    /// The scheduled surgery.
    pub surgery: PatientSurgery,
    /// Activity log, most recent first.
    #[serde(default)]
    pub latest_actions: Vec<ActionEntry>,
}
