//! Shared session cell.

use nexus_chat_core::Session;
use tokio::sync::watch;

/// Single-writer cell holding the [`Session`]. The supervisor writes; the
/// UI reads through [`SessionState::subscribe`].
#[derive(Debug)]
pub struct SessionState {
    tx: watch::Sender<Session>,
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut Session)) {
        // send_modify stores the value even with no receivers alive.
        self.tx.send_modify(f);
    }

    pub(crate) fn reset(&self) {
        self.tx.send_replace(Session::default());
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
