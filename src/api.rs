//! REST collaborator contract.
//!
//! The dashboard consumes a REST backend; this module captures that
//! contract as a trait so the core stays transport-free and testable.
//! An HTTP implementation lives with the embedding application; the
//! [`InMemoryStore`] here backs tests and offline sessions.
//!
//! # Response Shape
//!
//! `save_surgery` returns the **full updated roster**. The deployed
//! backend has answered with both the roster and the single updated
//! record at different times; the roster form is the one the dashboard
//! actually consumes, so the single-record form is treated as a defect,
//! not a variant to tolerate.
//!
//! The prediction endpoints are opaque external services: a single
//! `f64` (predicted total duration in hours, complication risk in
//! `0.0..=1.0`). No prediction logic lives in this crate.

use thiserror::Error;

use crate::models::{PatientRecord, Surgery};

/// Errors from the REST collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend was unreachable or answered with a failure status.
    #[error("could not reach the schedule service: {0}")]
    Transport(String),
    /// The backend answered with a payload that does not decode.
    #[error("schedule service returned a malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// The requested entity does not exist.
    #[error("no {0} on record")]
    NotFound(&'static str),
}

/// The backend surface the dashboard consumes.
///
/// Mirrors the REST endpoints one-to-one: `GET /surgeries`,
/// `POST /surgeries`, `GET /get_patient_data`, `GET /delay_prediction`,
/// `GET /complication_prediction`.
pub trait ScheduleStore {
    /// Fetches the day's roster.
    fn fetch_surgeries(&self) -> Result<Vec<Surgery>, StoreError>;

    /// Upserts one surgery and returns the full updated roster.
    fn save_surgery(&mut self, surgery: &Surgery) -> Result<Vec<Surgery>, StoreError>;

    /// Fetches the patient record for the portal.
    fn fetch_patient(&self) -> Result<PatientRecord, StoreError>;

    /// Predicted total surgery duration in hours.
    fn delay_prediction(&self) -> Result<f64, StoreError>;

    /// Complication risk score in `0.0..=1.0`.
    fn complication_prediction(&self) -> Result<f64, StoreError>;
}

/// In-memory store for tests and offline sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    surgeries: Vec<Surgery>,
    patient: Option<PatientRecord>,
    delay_prediction_hours: f64,
    complication_risk: f64,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the demo roster.
    pub fn with_mock_roster() -> Self {
        use crate::models::{ProgressStatus, SurgeryStatus, TimeType};
        Self {
            surgeries: vec![
                Surgery::new("1", "07:00", "11:30").with_title("Appendectomy"),
                Surgery::new("2", "12:00", "13:30")
                    .with_title("Hip Replacement")
                    .with_status(SurgeryStatus::InProgress)
                    .with_progress(ProgressStatus::Delayed)
                    .with_time_type(TimeType::Estimated)
                    .with_delay(30, "Equipment setup")
                    .with_downstream_impacts(2),
                Surgery::new("3", "14:00", "15:00")
                    .with_title("Cardiac Surgery")
                    .with_time_type(TimeType::Locked),
            ],
            ..Self::default()
        }
    }

    /// Seeds the patient record.
    pub fn with_patient(mut self, patient: PatientRecord) -> Self {
        self.patient = Some(patient);
        self
    }

    /// Seeds the prediction scores.
    pub fn with_predictions(mut self, delay_hours: f64, complication_risk: f64) -> Self {
        self.delay_prediction_hours = delay_hours;
        self.complication_risk = complication_risk;
        self
    }
}

impl ScheduleStore for InMemoryStore {
    fn fetch_surgeries(&self) -> Result<Vec<Surgery>, StoreError> {
        Ok(self.surgeries.clone())
    }

    fn save_surgery(&mut self, surgery: &Surgery) -> Result<Vec<Surgery>, StoreError> {
        match self.surgeries.iter_mut().find(|s| s.id == surgery.id) {
            Some(existing) => *existing = surgery.clone(),
            None => self.surgeries.push(surgery.clone()),
        }
        Ok(self.surgeries.clone())
    }

    fn fetch_patient(&self) -> Result<PatientRecord, StoreError> {
        self.patient.clone().ok_or(StoreError::NotFound("patient"))
    }

    fn delay_prediction(&self) -> Result<f64, StoreError> {
        Ok(self.delay_prediction_hours)
    }

    fn complication_prediction(&self) -> Result<f64, StoreError> {
        Ok(self.complication_risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeType;

    #[test]
    fn test_mock_roster() {
        let store = InMemoryStore::with_mock_roster();
        let roster = store.fetch_surgeries().unwrap();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster[1].delay_duration, Some(30));
        assert_eq!(roster[2].time_type, TimeType::Locked);
    }

    #[test]
    fn test_save_upserts_and_returns_roster() {
        let mut store = InMemoryStore::with_mock_roster();

        // Update in place
        let updated = Surgery::new("1", "07:00", "11:30")
            .with_title("Appendectomy")
            .with_delay(15, "Late start");
        let roster = store.save_surgery(&updated).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].delay_duration, Some(15));

        // Insert a new one
        let emergency = Surgery::new("emergency-1", "16:00", "17:00").with_title("X");
        let roster = store.save_surgery(&emergency).unwrap();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster[3].id, "emergency-1");
    }

    #[test]
    fn test_missing_patient() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.fetch_patient(),
            Err(StoreError::NotFound("patient"))
        ));
    }

    #[test]
    fn test_predictions() {
        let store = InMemoryStore::new().with_predictions(2.0, 0.12);
        assert!((store.delay_prediction().unwrap() - 2.0).abs() < 1e-10);
        assert!((store.complication_prediction().unwrap() - 0.12).abs() < 1e-10);
    }
}
