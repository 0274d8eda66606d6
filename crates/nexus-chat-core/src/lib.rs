//! Core types for the Nexus chat client.
//!
//! This crate provides the protocol primitives: validated names, the
//! session record, outbound messages, inbound events and the JSON wire
//! codec. Connection handling lives in `nexus-chat-client`.

pub mod codec;
mod error;
mod message;
mod names;
mod session;

pub use codec::{decode, encode};
pub use error::{DecodeError, ValidationError};
pub use message::{ChatMessage, InboundEvent, OutboundMessage};
pub use names::{Identity, RoomName};
pub use session::Session;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection has been attempted yet.
    #[default]
    Idle,
    /// Channel requested, waiting for it to open.
    Connecting,
    /// Channel open, frames flow both ways.
    Open,
    /// Channel gone. Reconnects automatically while logged in.
    Closed,
}
