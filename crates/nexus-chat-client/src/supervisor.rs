//! Connection lifecycle and delivery guarantees.
//!
//! [`Supervisor`] owns the one live channel, the outbound queue and the
//! timers. It is a plain state machine: every method runs to completion
//! without awaiting. [`crate::ChatClient`] drives it from a single task.

use crate::dispatcher::{dispatch, EventHandler};
use crate::queue::OutboundQueue;
use crate::scheduler::{Fired, Scheduler, Task, TaskHandle};
use crate::session::SessionState;
use crate::transport::{Channel, ChannelEvent, ConnectionId, Transport};
use crate::ClientConfig;
use nexus_chat_core::{
    codec, ConnectionState, Identity, OutboundMessage, RoomName, Session, ValidationError,
};

struct LiveChannel<C> {
    id: ConnectionId,
    channel: C,
    /// Set on `Opened`, cleared if the channel refuses a frame.
    writable: bool,
}

/// Owns the session lifecycle for one user. See the module docs.
pub struct Supervisor<T: Transport, S: Scheduler, H: EventHandler> {
    config: ClientConfig,
    transport: T,
    scheduler: S,
    handler: H,
    session: SessionState,
    queue: OutboundQueue,
    channel: Option<LiveChannel<T::Channel>>,
    last_id: ConnectionId,
    state: ConnectionState,
    reconnect: Option<TaskHandle>,
    roster: Option<TaskHandle>,
    /// Reconnects since the last successful open, for logging.
    attempt: u32,
}

impl<T: Transport, S: Scheduler, H: EventHandler> Supervisor<T, S, H> {
    pub fn new(
        config: ClientConfig,
        transport: T,
        scheduler: S,
        handler: H,
        session: SessionState,
    ) -> Self {
        Self {
            config,
            transport,
            scheduler,
            handler,
            session,
            queue: OutboundQueue::new(),
            channel: None,
            last_id: ConnectionId::new(0),
            state: ConnectionState::Idle,
            reconnect: None,
            roster: None,
            attempt: 0,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn queue(&self) -> &OutboundQueue {
        &self.queue
    }

    /// Validate login input, then start a session and open the channel.
    pub fn connect(&mut self, identity: &str, room: &str) -> Result<(), ValidationError> {
        let (identity, room) = Session::validate_login(identity, room)?;
        self.start_session(identity, room);
        Ok(())
    }

    /// Start a session with already-validated names. An existing session is
    /// logged out first.
    pub fn start_session(&mut self, identity: Identity, room: RoomName) {
        if self.session.snapshot().is_logged_in() {
            self.logout();
        }
        self.queue.clear();

        tracing::info!("logging in as {} to room {}", identity, room);
        self.session.update(|s| {
            s.identity = Some(identity);
            s.current_room = Some(room);
        });
        self.attempt = 0;
        self.open_channel();
    }

    /// Transmit now if the channel is open, otherwise queue for replay.
    pub fn send(&mut self, message: OutboundMessage) {
        if let Err(message) = self.transmit(message) {
            tracing::debug!("queueing {} ({} pending)", message.kind(), self.queue.len() + 1);
            self.queue.push(message);
        }
    }

    /// Publish `text` to the current room. Blank text, no session or no
    /// room is a no-op.
    pub fn send_chat(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let session = self.session.snapshot();
        if !session.is_logged_in() {
            tracing::debug!("dropping chat line: not logged in");
            return;
        }
        let Some(room) = session.current_room else {
            tracing::debug!("dropping chat line: no room joined");
            return;
        };
        self.send(OutboundMessage::Publish {
            room,
            text: text.to_string(),
        });
    }

    /// Switch rooms. Empty names, the current room and calls made while
    /// logged out are ignored.
    pub fn join_room(&mut self, name: &str) {
        let Ok(room) = RoomName::new(name) else {
            return;
        };
        let session = self.session.snapshot();
        if !session.is_logged_in() || session.is_in_room(room.as_str()) {
            return;
        }

        tracing::info!("switching to room {}", room);
        self.session.update(|s| s.current_room = Some(room.clone()));
        self.send(OutboundMessage::Join { room });
        self.request_roster();
    }

    /// Ask for the member list of the current room.
    pub fn request_roster(&mut self) {
        let session = self.session.snapshot();
        if !session.is_logged_in() {
            return;
        }
        if let Some(room) = session.current_room {
            self.send(OutboundMessage::Who { room });
        }
    }

    /// End the session. Safe to call when already logged out.
    pub fn logout(&mut self) {
        let was = self.session.snapshot();
        if !was.is_logged_in() {
            return;
        }

        tracing::info!("logging out");
        // Identity goes first so nothing below can trigger a reconnect.
        self.session.update(|s| s.identity = None);
        cancel(&mut self.reconnect);
        cancel(&mut self.roster);
        if let Some(mut live) = self.channel.take() {
            live.channel.close();
        }
        self.queue.clear();
        self.session.reset();
        self.state = ConnectionState::Closed;

        if was.connected {
            self.handler.on_connection_change(false);
        }
    }

    /// Feed a lifecycle event from the transport.
    pub fn handle_channel_event(&mut self, id: ConnectionId, event: ChannelEvent) {
        if self.channel.as_ref().map(|live| live.id) != Some(id) {
            tracing::debug!("ignoring {:?} from stale connection {}", event, id);
            return;
        }

        match event {
            ChannelEvent::Opened => self.on_open(),
            ChannelEvent::Frame(frame) => self.on_frame(&frame),
            ChannelEvent::Error(text) => {
                tracing::warn!("connection {} error: {}", id, text);
                self.handler.on_transient_warning(&text);
            }
            ChannelEvent::Closed => self.on_close(),
        }
    }

    /// Feed a timer firing from the scheduler.
    pub fn handle_timer(&mut self, fired: Fired) {
        match fired.task {
            Task::Reconnect => {
                if !take_if_armed(&mut self.reconnect, &fired) {
                    return;
                }
                if self.session.snapshot().is_logged_in() && self.channel.is_none() {
                    self.attempt += 1;
                    tracing::info!("reconnect attempt {}", self.attempt);
                    self.open_channel();
                }
            }
            Task::RosterRefresh => {
                if !take_if_armed(&mut self.roster, &fired) {
                    return;
                }
                if self.session.snapshot().connected {
                    self.request_roster();
                    self.arm_roster();
                }
            }
        }
    }

    fn open_channel(&mut self) {
        cancel(&mut self.reconnect);
        cancel(&mut self.roster);
        // Only one handle may be live.
        if let Some(mut old) = self.channel.take() {
            old.channel.close();
        }

        self.last_id = self.last_id.next();
        let id = self.last_id;
        tracing::info!("opening connection {} to {}", id, self.config.endpoint);
        let channel = self.transport.open(&self.config.endpoint, id);
        self.channel = Some(LiveChannel {
            id,
            channel,
            writable: false,
        });
        self.state = ConnectionState::Connecting;
    }

    fn on_open(&mut self) {
        let Session {
            identity: Some(identity),
            current_room: Some(room),
            ..
        } = self.session.snapshot()
        else {
            return;
        };

        if let Some(live) = self.channel.as_mut() {
            live.writable = true;
        }

        // Handshake frames are resent on every open, so a refused one is
        // dropped rather than queued.
        if self.transmit(OutboundMessage::Login { identity }).is_err()
            || self.transmit(OutboundMessage::Join { room }).is_err()
        {
            return;
        }

        while let Some(message) = self.queue.pop_front() {
            if let Err(message) = self.transmit(message) {
                self.queue.push_front(message);
                return;
            }
        }

        tracing::info!("connected to {}", self.config.endpoint);
        self.state = ConnectionState::Open;
        self.attempt = 0;
        self.session.update(|s| s.connected = true);
        self.handler.on_connection_change(true);
        self.arm_roster();
    }

    fn on_frame(&mut self, frame: &str) {
        match codec::decode(frame) {
            Ok(event) => dispatch(&event, &mut self.handler),
            Err(e) => tracing::warn!("dropping frame: {}", e),
        }
    }

    fn on_close(&mut self) {
        self.channel = None;
        self.state = ConnectionState::Closed;
        cancel(&mut self.roster);
        self.session.update(|s| s.connected = false);
        self.handler.on_connection_change(false);

        if self.session.snapshot().is_logged_in() {
            tracing::info!(
                "connection lost, retrying in {:?} ({} queued)",
                self.config.reconnect_delay(),
                self.queue.len()
            );
            cancel(&mut self.reconnect);
            self.reconnect = Some(
                self.scheduler
                    .schedule(self.config.reconnect_delay(), Task::Reconnect),
            );
        }
    }

    fn arm_roster(&mut self) {
        cancel(&mut self.roster);
        self.roster = Some(
            self.scheduler
                .schedule(self.config.roster_interval(), Task::RosterRefresh),
        );
    }

    /// Write `message` to the open channel, or hand it back.
    fn transmit(&mut self, message: OutboundMessage) -> Result<(), OutboundMessage> {
        let Some(live) = self.channel.as_mut().filter(|live| live.writable) else {
            return Err(message);
        };

        match live.channel.send(codec::encode(&message)) {
            Ok(()) => {
                tracing::debug!("sent {} on connection {}", message.kind(), live.id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("connection {} refused {}: {}", live.id, message.kind(), e);
                live.writable = false;
                Err(message)
            }
        }
    }
}

fn cancel(slot: &mut Option<TaskHandle>) {
    if let Some(handle) = slot.take() {
        handle.cancel();
    }
}

/// Clear `slot` and return true if `fired` is the task it holds.
fn take_if_armed(slot: &mut Option<TaskHandle>, fired: &Fired) -> bool {
    let armed = slot
        .as_ref()
        .is_some_and(|handle| handle.id() == fired.id && !handle.is_cancelled());
    if armed {
        *slot = None;
    } else {
        tracing::debug!("ignoring stale {:?} timer", fired.task);
    }
    armed
}
