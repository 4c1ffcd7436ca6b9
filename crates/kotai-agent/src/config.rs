//! Agent configuration loading from file and environment variables.

use kotai_prompt::{language, InstructionStrategy};
use kotai_voice::{LiveKitConfig, PipelineConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Env file read at startup for local credentials.
pub const ENV_FILE: &str = ".env.local";

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// How the system prompt is built.
    #[serde(default)]
    pub strategy: InstructionStrategy,

    /// Prompt template and render settings.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// External collaborators wired into the session.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Room credentials for the agent participant.
    #[serde(default)]
    pub livekit: LiveKitConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "kotai_prompt=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Prompt rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    /// Replacement for the built-in template. Must contain each placeholder once.
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// IANA zone the smalltalk clock reports in, e.g. "Europe/Paris".
    /// Unset means the host timezone.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Whether the agent speaks first.
    #[serde(default = "default_greet_on_enter")]
    pub greet_on_enter: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_greet_on_enter() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            timezone: None,
            greet_on_enter: default_greet_on_enter(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The env file exists but cannot be read or parsed.
    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenv::Error,
    },

    /// An override holds a value outside its domain.
    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

/// Process environment layered over the values of an env file.
///
/// Process variables take precedence, as with `dotenv`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    file: HashMap<String, String>,
}

impl Environment {
    /// The process environment alone.
    pub fn process() -> Self {
        Self::default()
    }

    /// Reads `path` in `dotenv` syntax. A missing file contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] if the file exists but is unreadable
    /// or malformed.
    pub fn with_env_file(path: &Path) -> Result<Self, ConfigError> {
        let env_file_error = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };
        let entries = match dotenv::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) if e.not_found() => return Ok(Self::default()),
            Err(e) => return Err(env_file_error(e)),
        };
        let file = entries
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(env_file_error)?;
        Ok(Self { file })
    }

    /// Looks up `key`, process environment first.
    pub fn var(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .or_else(|| self.file.get(key).cloned())
    }

    /// Number of variables the env file defined.
    pub fn file_vars(&self) -> usize {
        self.file.len()
    }
}

/// A loaded configuration and whether its file was found.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// A path was given but no file exists there; defaults were used.
    pub file_missing: bool,
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies overrides looked up in `env`.
///
/// Environment variable overrides:
/// - `KOTAI_LOG_LEVEL` overrides `logging.level`
/// - `KOTAI_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `KOTAI_LANGUAGE` overrides the strategy language ("" clears it)
/// - `KOTAI_LLM_MODEL` overrides `pipeline.llm.model`
/// - `KOTAI_LLM_DISPLAY_NAME` overrides `pipeline.llm.display_name`
/// - `KOTAI_STT_URL` overrides `pipeline.stt.base_url`
/// - `KOTAI_TTS_URL` overrides `pipeline.tts.base_url`
/// - `KOTAI_TTS_VOICE` overrides `pipeline.tts.voice`
/// - `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET` override the `livekit` credentials
/// - `KOTAI_ROOM` overrides `livekit.room`
/// - `KOTAI_TIMEZONE` overrides `prompt.timezone`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if an override is invalid.
pub fn load_config(path: Option<&str>, env: &Environment) -> Result<LoadedConfig, ConfigError> {
    let mut file_missing = false;
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                file_missing = true;
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| env.var(key))?;

    Ok(LoadedConfig {
        config,
        file_missing,
    })
}

/// Applies overrides from `lookup`, keyed by environment variable name.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for an unknown `KOTAI_LANGUAGE`.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup("KOTAI_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("KOTAI_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(tag) = lookup("KOTAI_LANGUAGE") {
        let tag = (!tag.is_empty()).then_some(tag.as_str());
        let language = language::parse_tag(tag)
            .map_err(|e| ConfigError::Invalid(format!("KOTAI_LANGUAGE: {e}")))?;
        config.strategy = config.strategy.clone().with_language(language);
    }
    if let Some(model) = lookup("KOTAI_LLM_MODEL") {
        config.pipeline.llm.model = model;
    }
    if let Some(name) = lookup("KOTAI_LLM_DISPLAY_NAME") {
        config.pipeline.llm.display_name = name;
    }
    if let Some(url) = lookup("KOTAI_STT_URL") {
        config.pipeline.stt.base_url = url;
    }
    if let Some(url) = lookup("KOTAI_TTS_URL") {
        config.pipeline.tts.base_url = url;
    }
    if let Some(voice) = lookup("KOTAI_TTS_VOICE") {
        config.pipeline.tts.voice = voice;
    }
    if let Some(url) = lookup("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Some(key) = lookup("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Some(secret) = lookup("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Some(room) = lookup("KOTAI_ROOM") {
        config.livekit.room = room;
    }
    if let Some(zone) = lookup("KOTAI_TIMEZONE") {
        config.prompt.timezone = (!zone.is_empty()).then_some(zone);
    }

    Ok(())
}
