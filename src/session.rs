//! Owned schedule session.
//!
//! One session owns the in-memory roster, the backing store, and the
//! notification channel, with an explicit lifecycle: created in the
//! connecting state, [`connect`](ScheduleSession::connect)ed when the
//! transport is up, and closed on drop. There is no shared or global
//! channel handle - a component that needs the channel is given this
//! session (or a clone of its channel handle).
//!
//! # Mutation Ordering
//!
//! Every mutation validates first, persists through the store second,
//! and only then touches local state and broadcasts. A failed store call
//! therefore leaves the displayed roster exactly as it was - no partial
//! apply.
//!
//! # Known Race
//!
//! Two sessions extending the same surgery concurrently are not
//! arbitrated here; the store's last write wins. The roster returned by
//! the losing session's next save reflects the winner.

use log::warn;
use thiserror::Error;

use crate::api::{ScheduleStore, StoreError};
use crate::channel::NotificationChannel;
use crate::layout::{layout_surgeries, TimelineLayout};
use crate::models::{DelayEvent, ScheduleWindow, Surgery};
use crate::ops::{apply_delay, create_emergency_surgery, EmergencyRequest, MutationError};
use crate::time::TimeError;
use crate::validation::{validate_roster, validate_surgery, ValidationError};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A mutation was rejected before persisting.
    #[error(transparent)]
    Mutation(#[from] MutationError),
    /// The backing store failed; local state is unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A time value failed to parse.
    #[error(transparent)]
    Time(#[from] TimeError),
    /// Entity invariants were violated.
    #[error("invalid surgery data: {}", format_validation(.0))]
    Invalid(Vec<ValidationError>),
    /// The referenced surgery is not on the roster.
    #[error("surgery '{0}' is not on the schedule")]
    UnknownSurgery(String),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A dashboard session: roster + store + channel.
pub struct ScheduleSession<S: ScheduleStore> {
    store: S,
    channel: NotificationChannel,
    surgeries: Vec<Surgery>,
}

impl<S: ScheduleStore> ScheduleSession<S> {
    /// Creates a session over a store. The channel starts connecting;
    /// call [`connect`](Self::connect) when the transport is up.
    pub fn new(store: S) -> Self {
        Self {
            store,
            channel: NotificationChannel::new(),
            surgeries: Vec::new(),
        }
    }

    /// Marks the channel connection established (queued events flush).
    pub fn connect(&self) {
        self.channel.open();
    }

    /// Handle to the session's channel, for subscribing receivers.
    pub fn channel(&self) -> NotificationChannel {
        self.channel.clone()
    }

    /// The current roster.
    pub fn surgeries(&self) -> &[Surgery] {
        &self.surgeries
    }

    /// Loads the roster from the store, replacing local state.
    ///
    /// A roster that violates entity invariants is rejected whole and
    /// local state keeps its previous value.
    pub fn load(&mut self) -> Result<&[Surgery], SessionError> {
        let fetched = self.store.fetch_surgeries()?;
        validate_roster(&fetched).map_err(SessionError::Invalid)?;
        self.surgeries = fetched;
        Ok(&self.surgeries)
    }

    /// Creates an emergency surgery, persists it, and adopts the
    /// store's updated roster.
    pub fn add_emergency(&mut self, request: &EmergencyRequest) -> Result<Surgery, SessionError> {
        let surgery = create_emergency_surgery(request)?;
        validate_surgery(&surgery).map_err(SessionError::Invalid)?;

        self.surgeries = self.store.save_surgery(&surgery)?;
        Ok(surgery)
    }

    /// Extends a surgery, persists the update, adopts the store's
    /// roster, and broadcasts the delay to the channel.
    ///
    /// The broadcast is best-effort once the mutation is persisted: a
    /// dead channel only delays the patient's notice, so it is logged
    /// rather than unwinding an already-saved update.
    pub fn extend_surgery(
        &mut self,
        surgery_id: &str,
        delay_minutes: i64,
        reason: &str,
    ) -> Result<Surgery, SessionError> {
        let current = self
            .surgeries
            .iter()
            .find(|s| s.id == surgery_id)
            .ok_or_else(|| SessionError::UnknownSurgery(surgery_id.to_string()))?;

        let updated = apply_delay(current, delay_minutes, reason)?;
        self.surgeries = self.store.save_surgery(&updated)?;

        let event = DelayEvent::for_patient(surgery_id, delay_minutes, reason);
        if let Err(err) = self.channel.publish(event) {
            warn!("delay for surgery '{surgery_id}' saved but not broadcast: {err}");
        }
        Ok(updated)
    }

    /// Lays out the current roster.
    pub fn layout(
        &self,
        window: &ScheduleWindow,
        current_offset: f64,
    ) -> Result<TimelineLayout, TimeError> {
        layout_surgeries(&self.surgeries, window, current_offset)
    }

    /// Suggested extension for a surgery, from the prediction service.
    pub fn suggested_delay(&self, surgery_id: &str) -> Result<i64, SessionError> {
        let surgery = self
            .surgeries
            .iter()
            .find(|s| s.id == surgery_id)
            .ok_or_else(|| SessionError::UnknownSurgery(surgery_id.to_string()))?;
        let predicted_hours = self.store.delay_prediction()?;
        Ok(crate::ops::suggest_delay_minutes(predicted_hours, surgery)?)
    }

    /// Complication risk score for the day, from the prediction service.
    pub fn complication_risk(&self) -> Result<f64, SessionError> {
        Ok(self.store.complication_prediction()?)
    }

    /// Tears the session down, closing the channel.
    pub fn close(&self) {
        self.channel.close();
    }
}

impl<S: ScheduleStore> Drop for ScheduleSession<S> {
    fn drop(&mut self) {
        self.channel.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryStore;
    use crate::channel::ChannelState;
    use crate::models::{PatientRecord, TimeType};
    use std::sync::{Arc, Mutex};

    fn session() -> ScheduleSession<InMemoryStore> {
        let mut session = ScheduleSession::new(InMemoryStore::with_mock_roster());
        session.connect();
        session.load().unwrap();
        session
    }

    #[test]
    fn test_load() {
        let session = session();
        assert_eq!(session.surgeries().len(), 3);
        assert_eq!(session.surgeries()[0].title, "Appendectomy");
    }

    #[test]
    fn test_add_emergency() {
        let mut session = session();
        let request = EmergencyRequest::new("Emergency Appendectomy", "16:00", 60);

        let created = session.add_emergency(&request).unwrap();
        assert_eq!(created.end_time, "17:00");
        assert_eq!(created.time_type, TimeType::Dynamic);
        assert_eq!(session.surgeries().len(), 4);
        assert!(session.surgeries().iter().any(|s| s.id == created.id));
    }

    #[test]
    fn test_add_emergency_invalid_leaves_state() {
        let mut session = session();
        let request = EmergencyRequest::new("", "16:00", 60);

        assert!(session.add_emergency(&request).is_err());
        assert_eq!(session.surgeries().len(), 3);
    }

    #[test]
    fn test_extend_surgery_persists_and_broadcasts() {
        let mut session = session();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = session.channel().subscribe(move |e: &DelayEvent| {
            sink.lock().unwrap().push(e.clone());
        });

        let updated = session.extend_surgery("1", 20, "Anesthesia delay").unwrap();
        assert_eq!(updated.delay_duration, Some(20));

        let local = session
            .surgeries()
            .iter()
            .find(|s| s.id == "1")
            .unwrap()
            .clone();
        assert_eq!(local.delay_duration, Some(20));

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].surgery_id, "1");
        assert_eq!(events[0].delay_minutes, Some(20));
        assert!(events[0].is_for("patient"));
    }

    #[test]
    fn test_extend_locked_surgery_rejected() {
        let mut session = session();
        let result = session.extend_surgery("3", 20, "Complication");

        assert!(matches!(
            result,
            Err(SessionError::Mutation(MutationError::LockedSurgery(_)))
        ));
        // Local state untouched
        let cardiac = session.surgeries().iter().find(|s| s.id == "3").unwrap();
        assert!(cardiac.delay_duration.is_none());
    }

    #[test]
    fn test_extend_unknown_surgery() {
        let mut session = session();
        assert!(matches!(
            session.extend_surgery("99", 20, "x"),
            Err(SessionError::UnknownSurgery(_))
        ));
    }

    #[test]
    fn test_store_failure_leaves_state() {
        struct FailingStore;
        impl ScheduleStore for FailingStore {
            fn fetch_surgeries(&self) -> Result<Vec<Surgery>, StoreError> {
                Ok(vec![Surgery::new("1", "09:00", "10:00").with_title("A")])
            }
            fn save_surgery(&mut self, _: &Surgery) -> Result<Vec<Surgery>, StoreError> {
                Err(StoreError::Transport("backend down".into()))
            }
            fn fetch_patient(&self) -> Result<PatientRecord, StoreError> {
                Err(StoreError::NotFound("patient"))
            }
            fn delay_prediction(&self) -> Result<f64, StoreError> {
                Err(StoreError::Transport("backend down".into()))
            }
            fn complication_prediction(&self) -> Result<f64, StoreError> {
                Err(StoreError::Transport("backend down".into()))
            }
        }

        let mut session = ScheduleSession::new(FailingStore);
        session.connect();
        session.load().unwrap();

        let result = session.extend_surgery("1", 20, "Anesthesia delay");
        assert!(matches!(result, Err(SessionError::Store(_))));

        // No partial apply
        let local = session.surgeries().iter().find(|s| s.id == "1").unwrap();
        assert!(local.delay_duration.is_none());
    }

    #[test]
    fn test_suggested_delay() {
        let mut session = ScheduleSession::new(
            InMemoryStore::with_mock_roster().with_predictions(5.0, 0.1),
        );
        session.load().unwrap();

        // Appendectomy runs 07:00-11:30 (270 min); predicted 300 min
        assert_eq!(session.suggested_delay("1").unwrap(), 30);
        assert!((session.complication_risk().unwrap() - 0.1).abs() < 1e-10);
    }

    #[test]
    fn test_drop_closes_channel() {
        let session = session();
        let channel = session.channel();
        assert_eq!(channel.state(), ChannelState::Open);

        drop(session);
        assert_eq!(channel.state(), ChannelState::Closed);
    }
}
