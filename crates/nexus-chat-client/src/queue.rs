//! Messages waiting for the channel to open.

use nexus_chat_core::OutboundMessage;
use std::collections::VecDeque;

/// Unbounded FIFO of unsent messages. Survives reconnects; only logout
/// clears it.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    pending: VecDeque<OutboundMessage>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: OutboundMessage) {
        self.pending.push_back(message);
    }

    /// Put back a message that could not be written, keeping its place.
    pub fn push_front(&mut self, message: OutboundMessage) {
        self.pending.push_front(message);
    }

    pub fn pop_front(&mut self) -> Option<OutboundMessage> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
