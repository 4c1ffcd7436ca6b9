//! Descriptors for the external collaborators of a voice session.
//!
//! These only describe what the agent runtime should wire up: which voice
//! activity detector and turn detector to load, and which
//! OpenAI-compatible endpoints serve transcription, replies and speech.
//! Defaults match a fully local deployment.

use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TTS speed bounds, inclusive.
const MIN_TTS_SPEED: f32 = 0.1;
const MAX_TTS_SPEED: f32 = 10.0;

/// Voice activity detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VadModel {
    /// Silero neural VAD.
    #[default]
    Silero,
    /// RMS energy threshold.
    Energy,
}

/// End-of-turn detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDetectorModel {
    /// Multilingual end-of-utterance model.
    #[default]
    Multilingual,
    /// English-only end-of-utterance model.
    English,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VadConfig {
    #[serde(default)]
    pub model: VadModel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnDetectionConfig {
    #[serde(default)]
    pub model: TurnDetectorModel,
}

fn default_stt_url() -> String {
    "http://localhost:8080/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_stt_language() -> String {
    "en".to_string()
}

fn default_llm_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_llm_model() -> String {
    "gemma3n:latest".to_string()
}

fn default_llm_display_name() -> String {
    kotai_prompt::templates::DEFAULT_MODEL_LABEL.to_string()
}

fn default_tts_url() -> String {
    "http://localhost:8000/v1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_tts_voice() -> String {
    "nova".to_string()
}

fn default_tts_speed() -> f32 {
    1.1
}

fn default_api_key() -> String {
    "dummy-key".to_string()
}

/// Speech-to-text endpoint.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SttConfig {
    #[serde(default = "default_stt_url")]
    pub base_url: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_stt_model")]
    pub model: String,
    /// Language hint passed to the transcriber.
    #[serde(default = "default_stt_language")]
    pub language: String,
    #[serde(default)]
    pub detect_language: bool,
    #[serde(default)]
    pub use_realtime: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: default_stt_url(),
            api_key: default_api_key(),
            model: default_stt_model(),
            language: default_stt_language(),
            detect_language: false,
            use_realtime: false,
        }
    }
}

impl fmt::Debug for SttConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SttConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language", &self.language)
            .field("detect_language", &self.detect_language)
            .field("use_realtime", &self.use_realtime)
            .finish()
    }
}

/// Reply-generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_url")]
    pub base_url: String,
    /// Model identifier sent to the endpoint.
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Label shown to the model in its own system prompt.
    #[serde(default = "default_llm_display_name")]
    pub display_name: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_url(),
            model: default_llm_model(),
            display_name: default_llm_display_name(),
        }
    }
}

/// Speech synthesis endpoint.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_url")]
    pub base_url: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_tts_model")]
    pub model: String,
    #[serde(default = "default_tts_voice")]
    pub voice: String,
    /// Speech speed multiplier (1.0 is normal).
    #[serde(default = "default_tts_speed")]
    pub speed: f32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_tts_url(),
            api_key: default_api_key(),
            model: default_tts_model(),
            voice: default_tts_voice(),
            speed: default_tts_speed(),
        }
    }
}

impl fmt::Debug for TtsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("speed", &self.speed)
            .finish()
    }
}

/// Every collaborator the agent runtime wires into a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub vad: VadConfig,
    #[serde(default)]
    pub turn_detection: TurnDetectionConfig,
    #[serde(default)]
    pub stt: SttConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub tts: TtsConfig,
}

impl PipelineConfig {
    /// Checks that every endpoint and model is set and the TTS speed is sane.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), VoiceError> {
        let required = [
            ("stt.base_url", &self.stt.base_url),
            ("stt.model", &self.stt.model),
            ("llm.base_url", &self.llm.base_url),
            ("llm.model", &self.llm.model),
            ("tts.base_url", &self.tts.base_url),
            ("tts.model", &self.tts.model),
            ("tts.voice", &self.tts.voice),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(VoiceError::Config(format!("{field} must not be empty")));
            }
        }

        if !(MIN_TTS_SPEED..=MAX_TTS_SPEED).contains(&self.tts.speed) {
            return Err(VoiceError::Config(format!(
                "tts.speed must be between {MIN_TTS_SPEED} and {MAX_TTS_SPEED}, got {}",
                self.tts.speed
            )));
        }

        Ok(())
    }
}
