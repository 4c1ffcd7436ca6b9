//! Error types for instruction composition.

/// Errors that prevent a system prompt from being produced.
///
/// None of these are retried: a prompt is either fully assembled or not
/// produced at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    /// The language tag has no instruction fragment.
    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    /// The prompt template is malformed.
    #[error("malformed prompt template: {0}")]
    Template(String),

    /// The local time or timezone could not be determined.
    #[error("clock unavailable: {0}")]
    Clock(String),
}
