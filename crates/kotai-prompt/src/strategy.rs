//! Instruction strategies: how the additional-instructions block is produced.

use crate::assembler::PromptAssembler;
use crate::context::{Clock, SmalltalkContext, SystemClock};
use crate::error::CompositionError;
use crate::language::{self, LanguageCode};
use crate::templates::{
    smalltalk_instructions, DEFAULT_ADDITIONAL_INSTRUCTIONS, DEFAULT_MODEL_LABEL, VOICE_BASICS,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

fn default_text() -> String {
    DEFAULT_ADDITIONAL_INSTRUCTIONS.to_string()
}

/// Selects how the system prompt is built for a session.
///
/// Deserializes from a table tagged by `type`:
///
/// ```toml
/// type = "constant"
/// text = "Ask about their day."
/// language = "fr"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstructionStrategy {
    /// Caller-supplied static instructions. Deterministic.
    Constant {
        #[serde(default = "default_text")]
        text: String,
        #[serde(default)]
        language: Option<LanguageCode>,
    },
    /// Instructions built from the current time and a random conversation starter.
    Smalltalk {
        #[serde(default)]
        language: Option<LanguageCode>,
    },
}

impl Default for InstructionStrategy {
    fn default() -> Self {
        Self::Smalltalk { language: None }
    }
}

impl InstructionStrategy {
    /// A constant strategy with the built-in filler text.
    pub fn constant(language: Option<LanguageCode>) -> Self {
        Self::Constant {
            text: default_text(),
            language,
        }
    }

    /// Returns the strategy tag as used in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Smalltalk { .. } => "smalltalk",
        }
    }

    pub fn language(&self) -> Option<LanguageCode> {
        match self {
            Self::Constant { language, .. } | Self::Smalltalk { language } => *language,
        }
    }

    /// Returns the same strategy with a different language preference.
    pub fn with_language(self, language: Option<LanguageCode>) -> Self {
        match self {
            Self::Constant { text, .. } => Self::Constant { text, language },
            Self::Smalltalk { .. } => Self::Smalltalk { language },
        }
    }

    /// Renders the full system prompt with the built-in template and model
    /// label, the local clock and the thread RNG.
    ///
    /// # Errors
    ///
    /// See [`render_with`](Self::render_with).
    pub fn render(&self) -> Result<String, CompositionError> {
        let assembler = PromptAssembler::builtin()?;
        self.render_with(
            &assembler,
            DEFAULT_MODEL_LABEL,
            &SystemClock::local(),
            &mut rand::thread_rng(),
        )
    }

    /// Renders the full system prompt.
    ///
    /// The clock and RNG are only consulted by the smalltalk strategy.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Clock`] if the smalltalk strategy cannot
    /// read the clock.
    pub fn render_with<C, R>(
        &self,
        assembler: &PromptAssembler,
        model_label: &str,
        clock: &C,
        rng: &mut R,
    ) -> Result<String, CompositionError>
    where
        C: Clock + ?Sized,
        R: Rng + ?Sized,
    {
        let additional = match self {
            Self::Constant { text, .. } => text.clone(),
            Self::Smalltalk { .. } => {
                let ctx = SmalltalkContext::gather(clock, rng)?;
                debug!(
                    current_time = %ctx.current_time,
                    timezone = %ctx.timezone,
                    starter = ctx.starter,
                    "gathered smalltalk context"
                );
                smalltalk_instructions(
                    DEFAULT_ADDITIONAL_INSTRUCTIONS,
                    &ctx.current_time,
                    &ctx.timezone,
                    ctx.starter,
                )
            }
        };

        let prompt = assembler.assemble(
            VOICE_BASICS,
            &additional,
            language::resolve(self.language()),
            model_label,
        );

        info!(
            strategy = self.kind(),
            language = self.language().map(LanguageCode::as_str).unwrap_or("none"),
            model = model_label,
            len = prompt.len(),
            "rendered system prompt"
        );

        Ok(prompt)
    }
}
