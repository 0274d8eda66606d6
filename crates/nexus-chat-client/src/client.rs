//! Async front for the supervisor.

use crate::scheduler::{Fired, Scheduler, TokioScheduler};
use crate::supervisor::Supervisor;
use crate::transport::{ChannelEvent, ConnectionId, Transport, WsTransport};
use crate::{ClientConfig, ClientError, EventHandler, SessionState};
use nexus_chat_core::{Identity, RoomName, Session};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Requests from the UI layer.
#[derive(Debug)]
enum Intent {
    Login(Identity, RoomName),
    SendChat(String),
    SwitchRoom(String),
    Logout,
    Shutdown,
}

/// Cloneable handle to a running client. The event loop stops, logging out
/// first, once every handle is dropped or [`ChatClient::shutdown`] is called.
#[derive(Debug, Clone)]
pub struct ChatClient {
    intents: mpsc::UnboundedSender<Intent>,
    session: watch::Receiver<Session>,
}

impl ChatClient {
    /// Start the event loop on the current tokio runtime.
    pub fn spawn<H>(config: ClientConfig, handler: H) -> (Self, JoinHandle<()>)
    where
        H: EventHandler + Send + 'static,
    {
        let (intents_tx, intents_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();

        let session = SessionState::new();
        let reader = session.subscribe();
        let supervisor = Supervisor::new(
            config,
            WsTransport::new(events_tx),
            TokioScheduler::new(fired_tx),
            handler,
            session,
        );
        let task = tokio::spawn(run(supervisor, intents_rx, events_rx, fired_rx));

        (
            Self {
                intents: intents_tx,
                session: reader,
            },
            task,
        )
    }

    /// Validate and log in. Invalid input is rejected here, before any
    /// connection attempt.
    pub fn login(&self, identity: &str, room: &str) -> Result<(), ClientError> {
        let (identity, room) = Session::validate_login(identity, room)?;
        self.submit(Intent::Login(identity, room))
    }

    pub fn send_chat(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.submit(Intent::SendChat(text.into()))
    }

    pub fn switch_room(&self, name: impl Into<String>) -> Result<(), ClientError> {
        self.submit(Intent::SwitchRoom(name.into()))
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.submit(Intent::Logout)
    }

    /// Log out and stop the event loop.
    pub fn shutdown(&self) -> Result<(), ClientError> {
        self.submit(Intent::Shutdown)
    }

    /// Current session.
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Receiver that is notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.clone()
    }

    fn submit(&self, intent: Intent) -> Result<(), ClientError> {
        self.intents.send(intent).map_err(|_| ClientError::Stopped)
    }
}

async fn run<T, S, H>(
    mut supervisor: Supervisor<T, S, H>,
    mut intents: mpsc::UnboundedReceiver<Intent>,
    mut events: mpsc::UnboundedReceiver<(ConnectionId, ChannelEvent)>,
    mut fired: mpsc::UnboundedReceiver<Fired>,
) where
    T: Transport,
    S: Scheduler,
    H: EventHandler,
{
    loop {
        tokio::select! {
            intent = intents.recv() => match intent {
                Some(Intent::Login(identity, room)) => supervisor.start_session(identity, room),
                Some(Intent::SendChat(text)) => supervisor.send_chat(&text),
                Some(Intent::SwitchRoom(name)) => supervisor.join_room(&name),
                Some(Intent::Logout) => supervisor.logout(),
                Some(Intent::Shutdown) | None => {
                    supervisor.logout();
                    break;
                }
            },
            Some((id, event)) = events.recv() => supervisor.handle_channel_event(id, event),
            Some(timer) = fired.recv() => supervisor.handle_timer(timer),
        }
    }
    tracing::debug!("client event loop stopped");
}
