//! Routing of decoded events to the UI layer.

use nexus_chat_core::{ChatMessage, InboundEvent};
use std::collections::BTreeSet;

/// Callbacks the UI layer receives. Every method defaults to a no-op so an
/// implementor only overrides what it renders.
pub trait EventHandler {
    fn on_connection_change(&mut self, _connected: bool) {}
    fn on_system_notice(&mut self, _text: &str) {}
    fn on_chat_message(&mut self, _message: &ChatMessage) {}
    fn on_history(&mut self, _messages: &[ChatMessage]) {}
    fn on_roster(&mut self, _members: &BTreeSet<String>) {}
    fn on_room_list(&mut self, _names: &[String]) {}
    fn on_protocol_error(&mut self, _text: &str) {}
    fn on_transient_warning(&mut self, _text: &str) {}
}

/// Hand `event` to the matching callback.
pub fn dispatch<H: EventHandler + ?Sized>(event: &InboundEvent, handler: &mut H) {
    match event {
        InboundEvent::System { text } => handler.on_system_notice(text),
        InboundEvent::Message(message) => handler.on_chat_message(message),
        InboundEvent::History { messages } => handler.on_history(messages),
        InboundEvent::Roster { members } => handler.on_roster(members),
        InboundEvent::Rooms { names } => handler.on_room_list(names),
        InboundEvent::Error { text } => handler.on_protocol_error(text),
        InboundEvent::Unknown => tracing::debug!("ignoring event with unknown tag"),
    }
}
