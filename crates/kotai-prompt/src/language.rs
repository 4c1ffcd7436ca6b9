//! Language preference codes and their instruction fragments.

use crate::error::CompositionError;
use serde::{Deserialize, Serialize};

/// Fragment used when no language preference is set, or for English.
const SOME_FRENCH: &str = "You can speak some French but mention you might have an accent";
const FRENCH: &str = "Speak French. You can speak some English but mention you might have an accent";
const ENGLISH_AND_FRENCH: &str = "You speak English and French";
const FRENCH_AND_ENGLISH: &str = "You speak French and English";

/// Language preference for a conversation.
///
/// Absence of a preference is modelled as `Option::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    /// English, with a little French.
    #[serde(rename = "en")]
    En,
    /// French, with a little English.
    #[serde(rename = "fr")]
    Fr,
    /// Fluent in both, English first.
    #[serde(rename = "en/fr")]
    EnFr,
    /// Fluent in both, French first.
    #[serde(rename = "fr/en")]
    FrEn,
}

impl LanguageCode {
    /// All sanctioned codes, in declaration order.
    pub const ALL: [LanguageCode; 4] = [Self::En, Self::Fr, Self::EnFr, Self::FrEn];

    /// Returns the canonical tag for this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::EnFr => "en/fr",
            Self::FrEn => "fr/en",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            "en/fr" => Ok(Self::EnFr),
            "fr/en" => Ok(Self::FrEn),
            _ => Err(CompositionError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Returns the language instruction fragment for a preference.
pub fn resolve(code: Option<LanguageCode>) -> &'static str {
    match code {
        None | Some(LanguageCode::En) => SOME_FRENCH,
        Some(LanguageCode::Fr) => FRENCH,
        Some(LanguageCode::EnFr) => ENGLISH_AND_FRENCH,
        Some(LanguageCode::FrEn) => FRENCH_AND_ENGLISH,
    }
}

/// Parses a raw language tag, failing on anything outside the sanctioned set.
///
/// No fallback is applied: `"de"`, `""` and `"EN"` are all errors. `None`
/// stays `None` and resolves to the default fragment.
///
/// # Errors
///
/// Returns [`CompositionError::UnknownLanguage`] for an unmapped tag.
pub fn parse_tag(tag: Option<&str>) -> Result<Option<LanguageCode>, CompositionError> {
    tag.map(str::parse::<LanguageCode>).transpose()
}
