//! Voice session wiring for the Kotai agent.
//!
//! Speech is handled by an external real-time agent runtime: voice
//! activity detection, turn detection, transcription, reply generation and
//! speech synthesis all live there. This crate describes those
//! collaborators, mints the LiveKit credentials the agent joins with, and
//! starts the runtime with a system prompt rendered once per session.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod room;
pub mod session;

pub use config::LiveKitConfig;
pub use error::VoiceError;
pub use pipeline::{
    LlmConfig, PipelineConfig, SttConfig, TtsConfig, TurnDetectionConfig, TurnDetectorModel,
    VadConfig, VadModel,
};
pub use room::RoomAccess;
pub use session::{AgentRuntime, AgentSpec, SessionConfigurator};
