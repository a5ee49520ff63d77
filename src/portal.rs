//! Patient-facing delay receiver.
//!
//! Holds the patient record the portal displays and reacts to
//! [`DelayEvent`]s addressed to the patient role: the surgery time moves
//! by the delay, the fasting cutoffs are recomputed (stop eating 6 hours
//! before, stop drinking 2 hours before), the status flips to delayed,
//! and an acknowledgeable entry lands at the head of the activity log.
//!
//! # Defensive No-Op
//!
//! When the stored surgery time does not parse, or the event carries no
//! delay, the update is skipped and the previous state is returned
//! unchanged - a logged warning, never an error. A half-applied update
//! would show a patient inconsistent fasting times.

use chrono::{DateTime, Duration, Utc};
use log::warn;

use crate::models::{ActionEntry, DelayEvent, PatientRecord, ProgressStatus};

/// Hours before surgery when eating must stop.
const STOP_EATING_HOURS: i64 = 6;
/// Hours before surgery when drinking must stop.
const STOP_DRINKING_HOURS: i64 = 2;

/// The patient portal's view state.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientPortal {
    record: PatientRecord,
    role: String,
    stop_eating_time: Option<DateTime<Utc>>,
    stop_drinking_time: Option<DateTime<Utc>>,
}

impl PatientPortal {
    /// Creates the portal state for a loaded record, deriving the
    /// fasting cutoffs from its surgery time (absent when the stored
    /// time does not parse).
    pub fn new(record: PatientRecord) -> Self {
        let cutoffs = parse_time(&record.surgery.time).map(fasting_cutoffs);
        Self {
            record,
            role: crate::models::RECEIVER_PATIENT.to_string(),
            stop_eating_time: cutoffs.map(|c| c.0),
            stop_drinking_time: cutoffs.map(|c| c.1),
        }
    }

    /// The displayed record.
    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    /// Last instant the patient may eat.
    pub fn stop_eating_time(&self) -> Option<DateTime<Utc>> {
        self.stop_eating_time
    }

    /// Last instant the patient may drink.
    pub fn stop_drinking_time(&self) -> Option<DateTime<Utc>> {
        self.stop_drinking_time
    }

    /// Handles a channel event, stamping the log entry with the current
    /// wall clock. Returns whether the state changed.
    pub fn on_event(&mut self, event: &DelayEvent) -> bool {
        self.on_event_at(event, Utc::now())
    }

    /// Handles a channel event with an explicit receipt instant.
    ///
    /// Events addressed to another role are ignored. A relevant event
    /// moves the surgery time by its delay, recomputes both fasting
    /// cutoffs, marks the surgery delayed, and prepends an activity-log
    /// entry. Returns `false` (state untouched) on the defensive no-op
    /// cases: unparseable stored time or absent delay.
    pub fn on_event_at(&mut self, event: &DelayEvent, received_at: DateTime<Utc>) -> bool {
        if !event.is_for(&self.role) {
            return false;
        }

        let Some(delay_minutes) = event.delay_minutes else {
            warn!(
                "delay event for surgery '{}' carries no delay; skipping update",
                event.surgery_id
            );
            return false;
        };
        let Some(current) = parse_time(&self.record.surgery.time) else {
            warn!(
                "stored surgery time {:?} does not parse; skipping delay update",
                self.record.surgery.time
            );
            return false;
        };

        let new_time = current + Duration::minutes(delay_minutes);
        let (stop_eating, stop_drinking) = fasting_cutoffs(new_time);

        self.record.surgery.time = new_time.to_rfc3339();
        self.record.surgery.status = ProgressStatus::Delayed;
        self.stop_eating_time = Some(stop_eating);
        self.stop_drinking_time = Some(stop_drinking);
        self.record.latest_actions.insert(
            0,
            ActionEntry::new(
                received_at.timestamp_millis(),
                format!(
                    "Surgery delayed by {delay_minutes} minute(s) due to {}",
                    event.reason
                ),
                "Just now",
            ),
        );
        true
    }

    /// Handles a raw wire payload from the channel connection.
    ///
    /// Decodes (tolerating double encoding) and applies. Malformed
    /// payloads are dropped with a warning; they never propagate.
    pub fn on_raw_message(&mut self, raw: &str) -> bool {
        match crate::channel::decode_event(raw) {
            Ok(event) => self.on_event(&event),
            Err(err) => {
                warn!("dropping malformed channel message: {err}");
                false
            }
        }
    }

    /// Countdown label to the surgery, e.g. `"3d 4h 5m"`.
    ///
    /// `None` when the stored time does not parse; a surgery already in
    /// the past reads `"0d 0h 0m"`.
    pub fn time_until(&self, now: DateTime<Utc>) -> Option<String> {
        let surgery = parse_time(&self.record.surgery.time)?;
        let diff = (surgery - now).max(Duration::zero());
        Some(format!(
            "{}d {}h {}m",
            diff.num_days(),
            diff.num_hours() % 24,
            diff.num_minutes() % 60
        ))
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn fasting_cutoffs(surgery_time: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        surgery_time - Duration::hours(STOP_EATING_HOURS),
        surgery_time - Duration::hours(STOP_DRINKING_HOURS),
    )
}
