//! Input validation for surgery rosters.
//!
//! Checks the structural invariants of surgeries before any create or
//! update is accepted. Detects:
//! - Empty ids and duplicate ids
//! - Malformed wall-clock times
//! - End times not strictly after start times
//! - Delay extensions without a reason, or with negative duration
//!
//! Validation is the creation/update gate; the layout engine itself is
//! deliberately more tolerant (a zero-duration block renders, it does not
//! error).

use std::collections::HashSet;

use crate::models::Surgery;
use crate::time::time_to_minutes;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A surgery has no id.
    EmptyId,
    /// Two surgeries share the same id.
    DuplicateId,
    /// A start or end time does not parse as `"HH:MM"`.
    MalformedTime,
    /// End time is not strictly after start time.
    EndNotAfterStart,
    /// A positive delay has no reason attached.
    MissingDelayReason,
    /// A delay extension is negative.
    NegativeDelay,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates one surgery against the entity invariants.
///
/// Checks:
/// 1. Non-empty id
/// 2. Parseable start and end times
/// 3. End strictly after start
/// 4. Non-negative delay duration
/// 5. Positive delay has a non-blank reason
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_surgery(surgery: &Surgery) -> ValidationResult {
    let mut errors = Vec::new();
    check_surgery(surgery, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a full roster: per-surgery invariants plus duplicate ids.
pub fn validate_roster(surgeries: &[Surgery]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for surgery in surgeries {
        if !surgery.id.is_empty() && !seen.insert(surgery.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate surgery ID: {}", surgery.id),
            ));
        }
        check_surgery(surgery, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_surgery(surgery: &Surgery, errors: &mut Vec<ValidationError>) {
    if surgery.id.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyId,
            "Surgery has no id",
        ));
    }

    let start = time_to_minutes(&surgery.start_time);
    let end = time_to_minutes(&surgery.end_time);
    for (label, parsed, raw) in [
        ("start", &start, &surgery.start_time),
        ("end", &end, &surgery.end_time),
    ] {
        if parsed.is_err() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedTime,
                format!("Surgery '{}' has malformed {label} time {raw:?}", surgery.id),
            ));
        }
    }

    if let (Ok(start), Ok(end)) = (start, end) {
        if end <= start {
            errors.push(ValidationError::new(
                ValidationErrorKind::EndNotAfterStart,
                format!(
                    "Surgery '{}' ends at {} which is not after its {} start",
                    surgery.id, surgery.end_time, surgery.start_time
                ),
            ));
        }
    }

    match surgery.delay_duration {
        Some(delay) if delay < 0 => {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDelay,
                format!(
                    "Surgery '{}' has a negative delay of {delay} minutes",
                    surgery.id
                ),
            ));
        }
        Some(delay) if delay > 0 => {
            let reason_blank = surgery
                .delay_reason
                .as_deref()
                .map_or(true, |r| r.trim().is_empty());
            if reason_blank {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingDelayReason,
                    format!(
                        "Surgery '{}' is delayed by {delay} minutes with no reason",
                        surgery.id
                    ),
                ));
            }
        }
        _ => {}
    }
}
