//! Language table
//!
//! The service works with a fixed set of languages. Each one has a static
//! [`LanguageProfile`] describing its display name, greeting phrases, the
//! labels an external classifier may use for it, and which synthesis
//! backends serve it.
//!
//! Unknown or malformed language codes resolve to English.

mod profiles;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::{Result, TtsError};

pub use profiles::PROFILES;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    English,
    Afrikaans,
    Zulu,
    Xhosa,
    Sepedi,
    Setswana,
    Sesotho,
    Xitsonga,
    Siswati,
    Tshivenda,
    Ndebele,
}

impl Language {
    /// Language used when a code cannot be resolved
    pub const DEFAULT: Language = Language::English;

    /// All languages in table order
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::Afrikaans,
            Language::Zulu,
            Language::Xhosa,
            Language::Sepedi,
            Language::Setswana,
            Language::Sesotho,
            Language::Xitsonga,
            Language::Siswati,
            Language::Tshivenda,
            Language::Ndebele,
        ]
    }

    /// Short code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Afrikaans => "af",
            Language::Zulu => "zu",
            Language::Xhosa => "xh",
            Language::Sepedi => "nso",
            Language::Setswana => "tn",
            Language::Sesotho => "st",
            Language::Xitsonga => "ts",
            Language::Siswati => "ss",
            Language::Tshivenda => "ve",
            Language::Ndebele => "nr",
        }
    }

    /// Static profile for this language
    pub fn profile(&self) -> &'static LanguageProfile {
        // The table is ordered like `Language::all()`; `validate_profiles`
        // checks that at startup.
        &PROFILES[*self as usize]
    }

    /// Resolve a client-supplied code, falling back to English.
    ///
    /// Matching is case-insensitive and accepts region-tagged forms
    /// (`zu-ZA`, `en_US`) by their primary subtag.
    pub fn from_code_or_default(code: &str) -> Language {
        code.parse().unwrap_or(Self::DEFAULT)
    }

    /// Map a raw classifier label to a language, if any alias matches
    pub fn from_classifier_label(label: &str) -> Option<Language> {
        ALIAS_INDEX.get(normalize_label(label).as_str()).copied()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let primary = lowered
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default();

        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.code() == primary)
            .ok_or_else(|| TtsError::invalid_field("lang_code", format!("Unsupported language code: {}", s)))
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Static description of one language
#[derive(Debug)]
pub struct LanguageProfile {
    pub language: Language,
    /// Display name
    pub name: &'static str,
    /// Canned greetings returned by language detection
    pub greetings: &'static [&'static str],
    /// Labels an external classifier may emit for this language, already
    /// in normalized form
    pub classifier_aliases: &'static [&'static str],
    /// Identifier of the native voice model (ISO 639-3)
    pub voice_id: &'static str,
    /// Code understood by the cloud TTS API, if it supports the language
    pub cloud_code: Option<&'static str>,
    /// Skip the native backend and go straight to the cloud API
    pub cloud_only: bool,
}

impl LanguageProfile {
    pub fn code(&self) -> &'static str {
        self.language.code()
    }

    /// Whether the native backend may be tried for this language
    pub fn native_eligible(&self) -> bool {
        !self.cloud_only
    }

    pub fn cloud_supported(&self) -> bool {
        self.cloud_code.is_some()
    }
}

/// Normalize a classifier label for alias lookup
///
/// Trims, lowercases, strips a fastText `__label__` prefix and replaces
/// `-` with `_`.
pub fn normalize_label(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    let stripped = lowered.strip_prefix("__label__").unwrap_or(&lowered);
    stripped.replace('-', "_")
}

static ALIAS_INDEX: Lazy<HashMap<&'static str, Language>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for profile in PROFILES.iter() {
        for alias in profile.classifier_aliases {
            index.entry(*alias).or_insert(profile.language);
        }
    }
    index
});

/// Codes of all supported languages, in table order
pub fn supported_codes() -> Vec<&'static str> {
    Language::all().iter().map(Language::code).collect()
}

/// Check the static table for consistency.
///
/// Called once at startup; a failure here is a programming error in the
/// table, reported as a configuration error.
pub fn validate_profiles() -> Result<()> {
    validate_table(PROFILES)
}

pub(crate) fn validate_table(table: &[LanguageProfile]) -> Result<()> {
    if table.len() != Language::all().len() {
        return Err(TtsError::config(format!(
            "language table has {} profiles, expected {}",
            table.len(),
            Language::all().len()
        )));
    }

    let mut seen_aliases: HashMap<&str, Language> = HashMap::new();
    let mut seen_languages = HashSet::new();

    for (idx, profile) in table.iter().enumerate() {
        if profile.language as usize != idx {
            return Err(TtsError::config(format!(
                "profile for '{}' is out of order",
                profile.code()
            )));
        }
        if !seen_languages.insert(profile.language) {
            return Err(TtsError::config(format!(
                "duplicate profile for '{}'",
                profile.code()
            )));
        }
        if profile.greetings.is_empty() {
            return Err(TtsError::config(format!(
                "profile '{}' has no greetings",
                profile.code()
            )));
        }
        if profile.classifier_aliases.is_empty() {
            return Err(TtsError::config(format!(
                "profile '{}' has no classifier aliases",
                profile.code()
            )));
        }
        if profile.cloud_only && profile.cloud_code.is_none() {
            return Err(TtsError::config(format!(
                "profile '{}' is cloud-only but has no cloud code",
                profile.code()
            )));
        }
        for alias in profile.classifier_aliases {
            if normalize_label(alias) != *alias {
                return Err(TtsError::config(format!(
                    "alias '{}' of '{}' is not normalized",
                    alias,
                    profile.code()
                )));
            }
            if let Some(owner) = seen_aliases.insert(alias, profile.language) {
                return Err(TtsError::config(format!(
                    "alias '{}' claimed by both '{}' and '{}'",
                    alias,
                    owner.code(),
                    profile.code()
                )));
            }
        }
    }

    Ok(())
}
