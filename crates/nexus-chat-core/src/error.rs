//! Error types shared by the client and its collaborators.

/// Login input rejected before any network action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("username cannot be empty")]
    EmptyIdentity,
    #[error("room name cannot be empty")]
    EmptyRoom,
}

/// An inbound frame that could not be decoded.
///
/// Non-fatal: the frame is dropped and the connection stays up.
#[derive(Debug, thiserror::Error)]
#[error("malformed frame: {0}")]
pub struct DecodeError(#[from] serde_json::Error);
