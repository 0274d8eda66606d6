//! The message channel underneath the supervisor.
//!
//! A [`Transport`] opens [`Channel`]s. Each channel reports its lifecycle as
//! [`ChannelEvent`]s tagged with the [`ConnectionId`] it was opened under,
//! so events from a torn-down channel can be told apart from the live one.

use crate::TransportError;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

/// Identifies one opened channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a channel, in the order a channel can produce them:
/// any number of `Error`s, at most one `Opened` followed by `Frame`s, and
/// exactly one final `Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Frame(String),
    Error(String),
    Closed,
}

pub trait Channel {
    /// Queue a text frame for sending. Fire-and-forget.
    fn send(&mut self, frame: String) -> Result<(), TransportError>;
    /// Start closing. A `Closed` event follows.
    fn close(&mut self);
}

pub trait Transport {
    type Channel: Channel;

    /// Begin opening a channel to `endpoint`. Returns immediately.
    fn open(&mut self, endpoint: &str, id: ConnectionId) -> Self::Channel;
}

/// Sender half the transport posts lifecycle events through.
pub type EventSender = mpsc::UnboundedSender<(ConnectionId, ChannelEvent)>;

/// WebSocket transport over `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct WsTransport {
    events: EventSender,
}

impl WsTransport {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

impl Transport for WsTransport {
    type Channel = WsChannel;

    fn open(&mut self, endpoint: &str, id: ConnectionId) -> WsChannel {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let closer = CancellationToken::new();

        tokio::spawn(run_channel(
            endpoint.to_string(),
            id,
            frames_rx,
            closer.clone(),
            self.events.clone(),
        ));

        WsChannel {
            frames: frames_tx,
            closer,
        }
    }
}

/// Handle to one WebSocket. Dropping it closes the socket.
#[derive(Debug)]
pub struct WsChannel {
    frames: mpsc::UnboundedSender<String>,
    closer: CancellationToken,
}

impl Channel for WsChannel {
    fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.frames
            .send(frame)
            .map_err(|_| TransportError::ChannelClosed)
    }

    fn close(&mut self) {
        self.closer.cancel();
    }
}

impl Drop for WsChannel {
    fn drop(&mut self) {
        self.closer.cancel();
    }
}

async fn run_channel(
    endpoint: String,
    id: ConnectionId,
    mut frames: mpsc::UnboundedReceiver<String>,
    closer: CancellationToken,
    events: EventSender,
) {
    let emit = |event: ChannelEvent| {
        // Receiver gone means the client shut down.
        let _ = events.send((id, event));
    };

    let connected = tokio::select! {
        _ = closer.cancelled() => {
            emit(ChannelEvent::Closed);
            return;
        }
        result = connect_async(endpoint.as_str()) => result,
    };

    let ws = match connected {
        Ok((ws, _response)) => ws,
        Err(source) => {
            let err = TransportError::Connect { endpoint, source };
            tracing::warn!("connection {} failed: {}", id, err);
            emit(ChannelEvent::Error(err.to_string()));
            emit(ChannelEvent::Closed);
            return;
        }
    };

    tracing::debug!("connection {} open to {}", id, endpoint);
    emit(ChannelEvent::Opened);
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            _ = closer.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }

            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = sink.send(Message::Text(frame.into())).await {
                    emit(ChannelEvent::Error(TransportError::from(e).to_string()));
                    break;
                }
            }

            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => emit(ChannelEvent::Frame(text.as_str().to_owned())),
                Some(Ok(Message::Close(_))) | None => break,
                // Pings are answered by tungstenite; binary frames are not part of the protocol.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    emit(ChannelEvent::Error(TransportError::from(e).to_string()));
                    break;
                }
            },
        }
    }

    tracing::debug!("connection {} closed", id);
    emit(ChannelEvent::Closed);
}
