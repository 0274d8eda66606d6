//! The session record read by the UI layer.

use crate::{Identity, RoomName, ValidationError};

/// Who is logged in, which room they are in, and whether the channel is up.
///
/// `connected` is only ever true while the underlying channel reports open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<Identity>,
    pub current_room: Option<RoomName>,
    pub connected: bool,
}

impl Session {
    /// Validate raw login input. Username is checked before room.
    pub fn validate_login(
        identity: &str,
        room: &str,
    ) -> Result<(Identity, RoomName), ValidationError> {
        Ok((Identity::new(identity)?, RoomName::new(room)?))
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_in_room(&self, name: &str) -> bool {
        self.current_room.as_ref().is_some_and(|r| r == name)
    }
}
