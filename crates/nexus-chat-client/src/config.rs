//! Client configuration.

use crate::ClientError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:2024";
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3_000;
pub const DEFAULT_ROSTER_INTERVAL_MS: u64 = 30_000;

/// Where to connect and how the timers behave.
///
/// ```toml
/// endpoint = "ws://chat.example.com:2024"
/// reconnect_delay_ms = 3000
/// roster_interval_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// WebSocket address, reused for every reconnect.
    pub endpoint: String,
    /// Fixed wait between a close and the next attempt. No backoff.
    pub reconnect_delay_ms: u64,
    /// Period of the member-list refresh while connected.
    pub roster_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            roster_interval_ms: DEFAULT_ROSTER_INTERVAL_MS,
        }
    }
}

impl ClientConfig {
    pub fn from_toml(text: &str) -> Result<Self, ClientError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn roster_interval(&self) -> Duration {
        Duration::from_millis(self.roster_interval_ms)
    }
}
