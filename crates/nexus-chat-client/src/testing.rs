//! In-memory doubles for driving the supervisor without a network.

use crate::scheduler::{Fired, Scheduler, Task, TaskHandle, TaskId};
use crate::transport::{Channel, ConnectionId, Transport};
use crate::{EventHandler, TransportError};
use nexus_chat_core::{codec, ChatMessage, OutboundMessage};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct TransportLog {
    opened: Vec<(ConnectionId, String)>,
    sent: Vec<(ConnectionId, String)>,
    closed: Vec<ConnectionId>,
    refuse_sends: bool,
}

/// Records every open, send and close. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    log: Arc<Mutex<TransportLog>>,
}

impl MockTransport {
    pub fn opened(&self) -> Vec<ConnectionId> {
        self.log.lock().unwrap().opened.iter().map(|(id, _)| *id).collect()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.log.lock().unwrap().opened.iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn last_opened(&self) -> ConnectionId {
        *self.opened().last().expect("no channel opened")
    }

    pub fn closed(&self) -> Vec<ConnectionId> {
        self.log.lock().unwrap().closed.clone()
    }

    /// Drain sent frames, decoded the way a server would see them.
    pub fn take_sent(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.log.lock().unwrap().sent)
            .into_iter()
            .map(|(_, frame)| codec::decode_outbound(&frame).expect("client sent a bad frame"))
            .collect()
    }

    pub fn refuse_sends(&self, refuse: bool) {
        self.log.lock().unwrap().refuse_sends = refuse;
    }
}

impl Transport for MockTransport {
    type Channel = MockChannel;

    fn open(&mut self, endpoint: &str, id: ConnectionId) -> MockChannel {
        self.log
            .lock()
            .unwrap()
            .opened
            .push((id, endpoint.to_string()));
        MockChannel {
            id,
            log: self.log.clone(),
        }
    }
}

#[derive(Debug)]
pub struct MockChannel {
    id: ConnectionId,
    log: Arc<Mutex<TransportLog>>,
}

impl Channel for MockChannel {
    fn send(&mut self, frame: String) -> Result<(), TransportError> {
        let mut log = self.log.lock().unwrap();
        if log.refuse_sends {
            return Err(TransportError::ChannelClosed);
        }
        log.sent.push((self.id, frame));
        Ok(())
    }

    fn close(&mut self) {
        self.log.lock().unwrap().closed.push(self.id);
    }
}

#[derive(Debug)]
pub struct Scheduled {
    pub id: TaskId,
    pub delay: Duration,
    pub task: Task,
    token: CancellationToken,
}

/// Scheduler whose timers only fire when a test says so.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next_id: Arc<AtomicU64>,
    scheduled: Arc<Mutex<Vec<Scheduled>>>,
}

impl ManualScheduler {
    /// Live (not cancelled, not yet taken) tasks of `kind`.
    pub fn pending(&self, kind: Task) -> Vec<(TaskId, Duration)> {
        self.scheduled
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.task == kind && !s.token.is_cancelled())
            .map(|s| (s.id, s.delay))
            .collect()
    }

    /// Every task of `kind` ever scheduled, cancelled or not.
    pub fn all(&self, kind: Task) -> Vec<Fired> {
        self.scheduled
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.task == kind)
            .map(|s| Fired { id: s.id, task: s.task })
            .collect()
    }

    /// Remove and return the oldest live task of `kind`.
    pub fn take_next(&self, kind: Task) -> Option<Fired> {
        let mut scheduled = self.scheduled.lock().unwrap();
        let index = scheduled
            .iter()
            .position(|s| s.task == kind && !s.token.is_cancelled())?;
        let s = scheduled.remove(index);
        Some(Fired { id: s.id, task: s.task })
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, task: Task) -> TaskHandle {
        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let token = CancellationToken::new();
        self.scheduled.lock().unwrap().push(Scheduled {
            id,
            delay,
            task,
            token: token.clone(),
        });
        TaskHandle::new(id, token)
    }
}

/// One UI callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Connection(bool),
    System(String),
    Chat(ChatMessage),
    History(Vec<ChatMessage>),
    Roster(Vec<String>),
    Rooms(Vec<String>),
    ProtocolError(String),
    Warning(String),
}

/// Handler that remembers every callback. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl RecordingHandler {
    pub fn take(&self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl EventHandler for RecordingHandler {
    fn on_connection_change(&mut self, connected: bool) {
        self.push(UiEvent::Connection(connected));
    }

    fn on_system_notice(&mut self, text: &str) {
        self.push(UiEvent::System(text.to_string()));
    }

    fn on_chat_message(&mut self, message: &ChatMessage) {
        self.push(UiEvent::Chat(message.clone()));
    }

    fn on_history(&mut self, messages: &[ChatMessage]) {
        self.push(UiEvent::History(messages.to_vec()));
    }

    fn on_roster(&mut self, members: &BTreeSet<String>) {
        self.push(UiEvent::Roster(members.iter().cloned().collect()));
    }

    fn on_room_list(&mut self, names: &[String]) {
        self.push(UiEvent::Rooms(names.to_vec()));
    }

    fn on_protocol_error(&mut self, text: &str) {
        self.push(UiEvent::ProtocolError(text.to_string()));
    }

    fn on_transient_warning(&mut self, text: &str) {
        self.push(UiEvent::Warning(text.to_string()));
    }
}
