//! JSON text-frame codec.
//!
//! Text is carried verbatim. Escaping for display is the UI's job.

use crate::{DecodeError, InboundEvent, OutboundMessage};

/// Encode a client message into a text frame.
pub fn encode(message: &OutboundMessage) -> String {
    // String-only fields and a string tag: serde_json has no error path here.
    serde_json::to_string(message).expect("outbound message is always serializable")
}

/// Decode a server frame. Unknown tags yield [`InboundEvent::Unknown`].
pub fn decode(frame: &str) -> Result<InboundEvent, DecodeError> {
    Ok(serde_json::from_str(frame)?)
}

/// Server-side view of a client frame, for test servers and tooling.
pub fn decode_outbound(frame: &str) -> Result<OutboundMessage, DecodeError> {
    Ok(serde_json::from_str(frame)?)
}

/// Server-side encoding of an event, for test servers and tooling.
pub fn encode_inbound(event: &InboundEvent) -> String {
    // Strings, string sets and sequences only; see `encode`.
    serde_json::to_string(event).expect("inbound event is always serializable")
}
