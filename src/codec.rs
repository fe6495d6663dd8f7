//! Envelope codec: raw bytes to [`Envelope`] and typed payloads to raw slots
//!
//! The codec never needs to know a trigger's request or response shape:
//! the envelope carries both as raw JSON, and handlers pick the type.

use crate::error::{TriggerError, Result};
use crate::types::Envelope;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

/// Decode an inbound envelope
///
/// The top level must be a JSON object. Missing fields are tolerated,
/// including `triggerSource`, which then routes to pass-through.
pub fn decode(payload: &[u8]) -> Result<Envelope> {
    if !starts_with_object(payload) {
        return Err(TriggerError::Decode(
            "envelope must be a JSON object".to_string(),
        ));
    }

    serde_json::from_slice(payload)
        .map_err(|e| TriggerError::Decode(format!("invalid envelope: {}", e)))
}

/// Encode an envelope to outbound bytes
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>> {
    serde_json::to_vec(envelope)
        .map_err(|e| TriggerError::Encode(format!("envelope: {}", e)))
}

/// Decode the trigger-specific request carried in the envelope
///
/// A missing or `null` request, or one that is not an object, is a
/// decode error for every routed trigger.
pub fn decode_request<T: DeserializeOwned>(envelope: &Envelope) -> Result<T> {
    let raw = envelope.request.as_ref().ok_or_else(|| {
        TriggerError::Decode(format!(
            "missing request payload for trigger '{}'",
            envelope.trigger_source
        ))
    })?;

    if !starts_with_object(raw.get().as_bytes()) {
        return Err(TriggerError::Decode(format!(
            "request for trigger '{}' must be a JSON object",
            envelope.trigger_source
        )));
    }

    serde_json::from_str(raw.get()).map_err(|e| {
        TriggerError::Decode(format!(
            "invalid request for trigger '{}': {}",
            envelope.trigger_source, e
        ))
    })
}

/// Encode a handler response into a raw payload for the response slot
///
/// Responses must encode to a JSON object. Anything else is an internal
/// fault, not a validation failure.
pub fn encode_sub_response<T: Serialize>(response: &T) -> Result<Box<RawValue>> {
    let raw = serde_json::value::to_raw_value(response)
        .map_err(|e| TriggerError::Encode(format!("response: {}", e)))?;

    if !raw.get().starts_with('{') {
        return Err(TriggerError::Encode(format!(
            "response must encode to a JSON object, got {}",
            raw.get()
        )));
    }

    Ok(raw)
}

fn starts_with_object(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}
