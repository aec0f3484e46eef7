//! Language detection
//!
//! Wraps an external text classifier and maps its labels onto the supported
//! languages, falling back to English when it cannot help.

pub mod classifier;
pub mod http;
pub mod identifier;
pub mod result;

pub use classifier::{normalize_predictions, ClassifierLoader, LanguageClassifier, Prediction};
pub use http::{HttpClassifier, HttpClassifierLoader};
pub use identifier::{LanguageIdentifier, FALLBACK_CONFIDENCE, MAX_CONFIDENCE, MIN_TEXT_CHARS};
pub use result::{Candidate, DetectionResult, DetectionSource, FallbackReason};
