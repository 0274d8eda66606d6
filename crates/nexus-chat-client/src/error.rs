use nexus_chat_core::ValidationError;

/// Channel-level failure. Reported to the UI as a transient warning; only
/// the close event decides connection state.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("socket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("channel already closed")]
    ChannelClosed,
}

/// Errors surfaced by [`crate::ChatClient`] and config loading.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("client event loop has stopped")]
    Stopped,
}
