//! Protocol messages.
//!
//! Both directions are closed sum types tagged by a `type` field. Inbound
//! tags this client does not know decode to [`InboundEvent::Unknown`].

use crate::{Identity, RoomName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Announce who this connection belongs to.
    Login {
        #[serde(rename = "username")]
        identity: Identity,
    },
    /// Enter a room, leaving the previous one.
    Join { room: RoomName },
    /// Post a chat line to a room.
    Publish {
        room: RoomName,
        #[serde(rename = "message")]
        text: String,
    },
    /// Ask for the member list of a room.
    Who { room: RoomName },
}

impl OutboundMessage {
    /// Wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::Login { .. } => "login",
            OutboundMessage::Join { .. } => "join",
            OutboundMessage::Publish { .. } => "publish",
            OutboundMessage::Who { .. } => "who",
        }
    }
}

/// A chat line, live or from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user: String,
    #[serde(rename = "message")]
    pub text: String,
    /// Server-formatted time, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Server notice (welcome, someone joined or left).
    System {
        #[serde(rename = "message")]
        text: String,
    },
    Message(ChatMessage),
    /// Recent messages of the room just joined, oldest first.
    History {
        #[serde(default)]
        messages: Vec<ChatMessage>,
    },
    /// Members of a room.
    #[serde(rename = "who")]
    Roster {
        #[serde(default)]
        members: BTreeSet<String>,
    },
    /// All rooms known to the server.
    Rooms {
        #[serde(default, rename = "rooms")]
        names: Vec<String>,
    },
    /// Request rejected by the server. The connection stays open.
    Error {
        #[serde(rename = "message")]
        text: String,
    },
    /// Any tag this client does not understand.
    #[serde(other)]
    Unknown,
}
