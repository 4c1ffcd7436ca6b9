//! Kotai agent process: loads configuration, renders the system prompt
//! once and hands the session plan to the external agent runtime.
//!
//! The runtime reads the plan as JSON from this process's stdout; logs go
//! to stderr.

pub mod config;
pub mod runtime;

use config::{Config, ConfigError, PromptConfig};
use kotai_prompt::{CompositionError, PromptAssembler, SystemClock};
use kotai_voice::{RoomAccess, SessionConfigurator, VoiceError};
use runtime::JsonPlanRuntime;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a session from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read prompt template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Prompt(#[from] CompositionError),

    #[error(transparent)]
    Voice(#[from] VoiceError),
}

/// Returns the assembler for the configured template, or the built-in one.
///
/// # Errors
///
/// Returns [`AppError::TemplateRead`] if the template file cannot be read
/// and [`AppError::Prompt`] if it is malformed.
pub fn build_assembler(prompt: &PromptConfig) -> Result<PromptAssembler, AppError> {
    match &prompt.template_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| AppError::TemplateRead {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), "using custom prompt template");
            Ok(PromptAssembler::from_template_text(&text)?)
        }
        None => Ok(PromptAssembler::builtin()?),
    }
}

/// Starts one agent session, writing its plan to `out`.
///
/// # Errors
///
/// Returns the first failure; nothing is written to `out` in that case.
pub fn run<W: Write>(config: &Config, out: W) -> Result<(), AppError> {
    let assembler = build_assembler(&config.prompt)?;
    let room = RoomAccess::for_agent(&config.livekit)?;
    let clock = match &config.prompt.timezone {
        Some(zone) => SystemClock::in_zone(zone.as_str()),
        None => SystemClock::local(),
    };

    let configurator = SessionConfigurator::new(config.pipeline.clone(), assembler)
        .with_clock(clock)
        .with_greeting(config.prompt.greet_on_enter);

    let mut runtime = JsonPlanRuntime::new(out);
    configurator.start(&config.strategy, room, &mut runtime)?;

    Ok(())
}
