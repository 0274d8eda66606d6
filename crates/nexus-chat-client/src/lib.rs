//! Client-side session manager for Nexus chat.
//!
//! Keeps one logical WebSocket connection to the chat server, reconnects
//! after failure, queues outbound messages while offline and replays them
//! in order, and routes inbound events to an [`EventHandler`].
//!
//! ```rust,ignore
//! let (client, task) = ChatClient::spawn(ClientConfig::default(), MyUi::new());
//! client.login("alice", "general")?;
//! client.send_chat("hello")?;
//! ```

mod client;
mod config;
mod dispatcher;
mod error;
mod queue;
pub mod scheduler;
mod session;
mod supervisor;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::ChatClient;
pub use config::ClientConfig;
pub use dispatcher::{dispatch, EventHandler};
pub use error::{ClientError, TransportError};
pub use queue::OutboundQueue;
pub use session::SessionState;
pub use supervisor::Supervisor;

pub use nexus_chat_core as protocol;
