use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// What the agent runtime needs to join its LiveKit room.
#[derive(Clone, Serialize)]
pub struct RoomAccess {
    pub url: String,
    pub room: String,
    pub identity: String,
    pub token: String,
}

impl fmt::Debug for RoomAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomAccess")
            .field("url", &self.url)
            .field("room", &self.room)
            .field("identity", &self.identity)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl RoomAccess {
    /// Mints a join token for the agent participant.
    ///
    /// Returns `Ok(None)` when LiveKit is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Config`] if LiveKit is enabled without a room
    /// or credentials, or [`VoiceError::LiveKit`] if signing fails.
    pub fn for_agent(config: &LiveKitConfig) -> Result<Option<Self>, VoiceError> {
        if !config.is_enabled() {
            return Ok(None);
        }
        if config.room.is_empty() {
            return Err(VoiceError::Config(
                "livekit.room must be set when livekit.url is configured".to_string(),
            ));
        }
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(VoiceError::Config(
                "livekit.api_key and livekit.api_secret are required".to_string(),
            ));
        }

        let token = AccessToken::with_api_key(&config.api_key, &config.api_secret)
            .with_identity(&config.agent_identity)
            .with_name(&config.agent_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: config.room.clone(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(config.token_ttl_seconds))
            .to_jwt()?;

        Ok(Some(Self {
            url: config.url.clone(),
            room: config.room.clone(),
            identity: config.agent_identity.clone(),
            token,
        }))
    }
}
