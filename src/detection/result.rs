//! Detection result types

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Where a detection result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Classifier,
    Fallback,
}

/// Why detection fell back to the default language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Trimmed text shorter than the minimum length
    TextTooShort,
    /// Classifier disabled, or its load failed
    ClassifierUnavailable,
    /// The classifier call failed or timed out
    ClassifierError,
    /// Nothing usable in the classifier output
    NoPredictions,
    /// Predictions exist but none maps to a supported language
    NoSupportedLanguage,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextTooShort => "text_too_short",
            Self::ClassifierUnavailable => "classifier_unavailable",
            Self::ClassifierError => "classifier_error",
            Self::NoPredictions => "no_predictions",
            Self::NoSupportedLanguage => "no_supported_language",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classifier label with its score and mapped language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub score: f64,
    /// `None` when the label is not a supported language
    pub code: Option<Language>,
}

/// Outcome of language detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Display name
    pub language: String,
    pub code: Language,
    /// Percent, at most 99
    pub confidence: f64,
    pub greeting: String,
    pub source: DetectionSource,
    pub model: String,
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FallbackReason>,
}

impl DetectionResult {
    pub fn is_fallback(&self) -> bool {
        self.source == DetectionSource::Fallback
    }
}
