//! Instruction composition for the Kotai voice agent.
//!
//! Builds the system prompt handed to the language model once per
//! session. A prompt is the built-in template filled with:
//!
//! | Slot | Source |
//! |------|--------|
//! | `{voice_basics}` | fixed speech-output rules |
//! | `{language_instructions}` | [`language::resolve`] |
//! | `{additional_instructions}` | the [`InstructionStrategy`] |
//! | `{model_name}` | the model label |
//!
//! Rendering is synchronous and touches no shared mutable state, so
//! independent sessions can render concurrently.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kotai_prompt::{InstructionStrategy, LanguageCode};
//!
//! let strategy = InstructionStrategy::Smalltalk { language: Some(LanguageCode::Fr) };
//! let prompt = strategy.render()?;
//! ```

pub mod assembler;
pub mod context;
mod error;
pub mod language;
mod strategy;
pub mod templates;

pub use assembler::{PromptAssembler, PromptTemplate, Slot};
pub use context::{Clock, ClockReading, FixedClock, SmalltalkContext, SystemClock};
pub use error::CompositionError;
pub use language::LanguageCode;
pub use strategy::InstructionStrategy;

#[cfg(test)]
mod tests;
