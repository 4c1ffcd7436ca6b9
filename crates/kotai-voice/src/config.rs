use serde::{Deserialize, Serialize};
use std::fmt;

fn default_token_ttl_seconds() -> u64 {
    3600
}

fn default_agent_identity() -> String {
    "kotai-agent".to_string()
}

fn default_agent_name() -> String {
    "Kotai".to_string()
}

/// LiveKit credentials used to let the agent join a room.
#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    /// Server URL. Empty disables token minting.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
    /// JWT token TTL in seconds for LiveKit join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
    /// Room the agent joins.
    #[serde(default)]
    pub room: String,
    #[serde(default = "default_agent_identity")]
    pub agent_identity: String,
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
            room: String::new(),
            agent_identity: default_agent_identity(),
            agent_name: default_agent_name(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("room", &self.room)
            .field("agent_identity", &self.agent_identity)
            .field("agent_name", &self.agent_name)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            room: room.into(),
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }
}
