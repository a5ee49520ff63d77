//! Operating-room schedule core.
//!
//! Domain models, timeline layout, and delay propagation for a theatre
//! scheduling dashboard: surgeries render as vertically positioned
//! blocks in a day window, delay extensions hang below their block, and
//! a delay broadcast reaches the patient portal over a notification
//! channel.
//!
//! # Modules
//!
//! - **`time`**: `"HH:MM"` wall-clock arithmetic
//! - **`models`**: domain types - `Surgery`, `ScheduleWindow`,
//!   `DelayEvent`, `PatientRecord`
//! - **`validation`**: entity invariant checks (duplicate ids, time
//!   order, delay reasons)
//! - **`layout`**: pure timeline layout engine and position-derived
//!   status
//! - **`stats`**: day-summary display figures
//! - **`ops`**: delay and emergency mutation operations
//! - **`channel`**: pub/sub delay notification channel and wire codec
//! - **`portal`**: patient-facing receiver (fasting cutoffs, activity
//!   log)
//! - **`api`**: REST collaborator contract and in-memory store
//! - **`config`**: endpoint configuration from the environment
//! - **`session`**: owned roster + store + channel with explicit
//!   lifecycle
//!
//! # Architecture
//!
//! The core is single-threaded and event-driven: a form submit or a
//! channel message triggers a synchronous recomputation. The layout
//! engine is pure and re-runs whenever its inputs change; persistence
//! and transport are collaborators behind the `ScheduleStore` trait and
//! the channel, never blocking the layout path.

pub mod api;
pub mod channel;
pub mod config;
pub mod layout;
pub mod models;
pub mod ops;
pub mod portal;
pub mod session;
pub mod stats;
pub mod time;
pub mod validation;
