//! Prompt template parsing and assembly.
//!
//! A [`PromptTemplate`] is parsed once and validated up front: every
//! [`Slot`] must appear exactly once and no unknown placeholder may
//! remain. After that, [`PromptAssembler::assemble`] is a plain string
//! fill that cannot fail.

use crate::error::CompositionError;
use crate::templates::BASE_TEMPLATE;
use std::borrow::Cow;
use std::sync::LazyLock;

/// The built-in template, parsed on first use and shared for the process lifetime.
static BUILTIN_TEMPLATE: LazyLock<Result<PromptTemplate, CompositionError>> =
    LazyLock::new(|| PromptTemplate::parse(BASE_TEMPLATE));

/// A named insertion point in a prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Speech-output rules.
    VoiceBasics,
    /// Language fragment from the resolver.
    LanguageInstructions,
    /// Strategy output.
    AdditionalInstructions,
    /// Label of the underlying model.
    ModelName,
}

impl Slot {
    /// All slots a template must contain.
    pub const ALL: [Slot; 4] = [
        Self::VoiceBasics,
        Self::LanguageInstructions,
        Self::AdditionalInstructions,
        Self::ModelName,
    ];

    /// Returns the placeholder name as written between braces.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::VoiceBasics => "voice_basics",
            Self::LanguageInstructions => "language_instructions",
            Self::AdditionalInstructions => "additional_instructions",
            Self::ModelName => "model_name",
        }
    }

    fn from_placeholder(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.placeholder() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A validated prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses template text containing `{placeholder}` markers.
    ///
    /// `{{` and `}}` stand for literal braces.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Template`] if a brace is unbalanced, a
    /// placeholder is unknown, or any slot is missing or repeated.
    pub fn parse(text: &str) -> Result<Self, CompositionError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(CompositionError::Template(format!(
                            "unterminated placeholder `{{{name}`"
                        )));
                    }
                    let slot = Slot::from_placeholder(&name).ok_or_else(|| {
                        CompositionError::Template(format!("unknown placeholder `{{{name}}}`"))
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(CompositionError::Template(
                        "unmatched `}` outside a placeholder".to_string(),
                    ));
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        for slot in Slot::ALL {
            let count = segments
                .iter()
                .filter(|s| **s == Segment::Slot(slot))
                .count();
            match count {
                1 => {}
                0 => {
                    return Err(CompositionError::Template(format!(
                        "missing placeholder `{{{}}}`",
                        slot.placeholder()
                    )))
                }
                _ => {
                    return Err(CompositionError::Template(format!(
                        "placeholder `{{{}}}` appears {count} times",
                        slot.placeholder()
                    )))
                }
            }
        }

        Ok(Self { segments })
    }

    /// Returns the built-in template.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the built-in text is malformed.
    pub fn builtin() -> Result<&'static PromptTemplate, CompositionError> {
        BUILTIN_TEMPLATE.as_ref().map_err(Clone::clone)
    }

    /// Returns the slots in the order they appear in the template.
    pub fn slot_order(&self) -> Vec<Slot> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(slot) => Some(*slot),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

/// Fills a [`PromptTemplate`] into a final system prompt.
///
/// Assemblers over the built-in template borrow the shared static copy.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    pub(crate) template: Cow<'static, PromptTemplate>,
}

impl PromptAssembler {
    pub fn new(template: PromptTemplate) -> Self {
        Self {
            template: Cow::Owned(template),
        }
    }

    /// Creates an assembler over the built-in template.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the built-in text is malformed.
    pub fn builtin() -> Result<Self, CompositionError> {
        Ok(Self {
            template: Cow::Borrowed(PromptTemplate::builtin()?),
        })
    }

    /// Parses `text` and wraps it in an assembler.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Template`] for a malformed template.
    pub fn from_template_text(text: &str) -> Result<Self, CompositionError> {
        Ok(Self::new(PromptTemplate::parse(text)?))
    }

    /// Fills every slot. Empty inputs are legal and leave their slot blank.
    pub fn assemble(
        &self,
        voice_basics: &str,
        additional_instructions: &str,
        language_instructions: &str,
        model_label: &str,
    ) -> String {
        let mut out = String::new();
        for segment in &self.template.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::VoiceBasics) => out.push_str(voice_basics),
                Segment::Slot(Slot::AdditionalInstructions) => {
                    out.push_str(additional_instructions)
                }
                Segment::Slot(Slot::LanguageInstructions) => out.push_str(language_instructions),
                Segment::Slot(Slot::ModelName) => out.push_str(model_label),
            }
        }
        out
    }
}
