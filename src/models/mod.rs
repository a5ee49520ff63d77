//! Scheduling domain models.
//!
//! Core data types for the theatre timeline: the surgery entity and its
//! status enums, the layout window, the delay notification message, and
//! the patient record wire shapes.
//!
//! All wire-facing types serialize in the REST collaborator's field
//! naming (camelCase fields, kebab-case enum values).

mod event;
mod patient;
mod surgery;
mod window;

pub use event::{DelayEvent, RECEIVER_PATIENT};
pub use patient::{ActionEntry, PatientRecord, PatientSurgery};
pub use surgery::{ProgressStatus, Surgery, SurgeryStatus, TimeType};
pub use window::{HourMark, ScheduleWindow};
