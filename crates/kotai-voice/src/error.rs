use kotai_prompt::CompositionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("LiveKit API error: {0}")]
    LiveKit(#[from] livekit_api::access_token::AccessTokenError),

    #[error("Prompt composition failed: {0}")]
    Prompt(#[from] CompositionError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Agent runtime error: {0}")]
    Runtime(String),
}
