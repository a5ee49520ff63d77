//! JSON wire codec for delay events.
//!
//! Messages on the persistent connection are JSON-encoded
//! [`DelayEvent`]s. Some producers double-encode (a JSON string whose
//! content is itself JSON); `decode_event` tolerates that deliberately,
//! as compatibility with the deployed producers, by parsing a second
//! time when the first parse yields a string.

use serde_json::Value;

use super::ChannelError;
use crate::models::DelayEvent;

/// Encodes an event for the wire.
pub fn encode_event(event: &DelayEvent) -> Result<String, ChannelError> {
    Ok(serde_json::to_string(event)?)
}

/// Decodes a wire payload, tolerating double encoding.
///
/// Malformed payloads are errors for the caller to log and drop; they
/// must never tear down the receiving session.
pub fn decode_event(raw: &str) -> Result<DelayEvent, ChannelError> {
    let value: Value = serde_json::from_str(raw)?;
    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)?,
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}
