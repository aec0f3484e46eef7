//! Language identification
//!
//! [`LanguageIdentifier::detect_language`] never fails: whenever the
//! classifier cannot give a usable answer the result falls back to English
//! with a fixed confidence and a reason explaining why.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::detection::classifier::{normalize_predictions, ClassifierLoader, LanguageClassifier};
use crate::detection::http::HttpClassifierLoader;
use crate::detection::result::{Candidate, DetectionResult, DetectionSource, FallbackReason};
use crate::language::Language;
use crate::server::config::ClassifierConfig;

/// Confidence reported for fallback results
pub const FALLBACK_CONFIDENCE: f64 = 55.0;

/// Upper bound on reported confidence
pub const MAX_CONFIDENCE: f64 = 99.0;

/// Shortest trimmed text worth classifying
pub const MIN_TEXT_CHARS: usize = 3;

/// Model name reported when no classifier is configured
const NO_MODEL: &str = "none";

/// Detects the language of a text using a lazily loaded classifier
pub struct LanguageIdentifier {
    loader: Option<Arc<dyn ClassifierLoader>>,
    /// Loaded once; `None` inside means the load failed or is disabled
    classifier: OnceCell<Option<Arc<dyn LanguageClassifier>>>,
    rng: Mutex<StdRng>,
}

impl LanguageIdentifier {
    pub fn new(loader: Option<Arc<dyn ClassifierLoader>>) -> Self {
        Self {
            loader,
            classifier: OnceCell::new(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Identifier without a classifier; every result is a fallback
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Identifier backed by the HTTP classifier when enabled
    pub fn from_config(config: &ClassifierConfig) -> Self {
        if config.enabled {
            Self::new(Some(Arc::new(HttpClassifierLoader::new(config.clone()))))
        } else {
            info!("Language classifier disabled; detection will default to English");
            Self::disabled()
        }
    }

    /// Use a deterministic greeting choice
    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Whether the classifier has been loaded successfully
    pub fn classifier_loaded(&self) -> bool {
        matches!(self.classifier.get(), Some(Some(_)))
    }

    /// Model name of the configured classifier, `"none"` without one
    pub fn model_name(&self) -> &str {
        self.loader.as_ref().map_or(NO_MODEL, |l| l.model_name())
    }

    async fn classifier(&self) -> Option<Arc<dyn LanguageClassifier>> {
        self.classifier
            .get_or_init(|| async {
                let loader = self.loader.as_ref()?;
                info!(model = loader.model_name(), "Loading language classifier (first use)");
                match loader.load().await {
                    Ok(classifier) => Some(classifier),
                    Err(e) => {
                        warn!(error = %e, "Language classifier unavailable; detection will default to English");
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// Detect the language of `text`
    pub async fn detect_language(&self, text: &str) -> DetectionResult {
        let text = text.trim();
        if text.chars().count() < MIN_TEXT_CHARS {
            return self.fallback(FallbackReason::TextTooShort, Vec::new());
        }

        let Some(classifier) = self.classifier().await else {
            return self.fallback(FallbackReason::ClassifierUnavailable, Vec::new());
        };

        let raw = match classifier.classify(text).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Language classification failed");
                return self.fallback(FallbackReason::ClassifierError, Vec::new());
            }
        };

        let candidates: Vec<Candidate> = normalize_predictions(&raw)
            .into_iter()
            .map(|p| Candidate {
                code: Language::from_classifier_label(&p.label),
                label: p.label,
                score: p.score,
            })
            .collect();

        if candidates.is_empty() {
            debug!(raw = %raw, "Classifier returned no usable predictions");
            return self.fallback(FallbackReason::NoPredictions, candidates);
        }

        let mut best: Option<(Language, f64)> = None;
        for candidate in &candidates {
            if let Some(code) = candidate.code {
                if best.map_or(true, |(_, score)| candidate.score > score) {
                    best = Some((code, candidate.score));
                }
            }
        }

        let Some((language, score)) = best else {
            debug!(top = %candidates[0].label, "No prediction maps to a supported language");
            return self.fallback(FallbackReason::NoSupportedLanguage, candidates);
        };

        let profile = language.profile();
        DetectionResult {
            language: profile.name.to_string(),
            code: language,
            confidence: score.min(MAX_CONFIDENCE),
            greeting: self.greeting(language),
            source: DetectionSource::Classifier,
            model: classifier.model_name().to_string(),
            candidates,
            reason: None,
        }
    }

    fn fallback(&self, reason: FallbackReason, candidates: Vec<Candidate>) -> DetectionResult {
        let language = Language::DEFAULT;
        DetectionResult {
            language: language.profile().name.to_string(),
            code: language,
            confidence: FALLBACK_CONFIDENCE,
            greeting: self.greeting(language),
            source: DetectionSource::Fallback,
            model: self.model_name().to_string(),
            candidates,
            reason: Some(reason),
        }
    }

    fn greeting(&self, language: Language) -> String {
        let greetings = language.profile().greetings;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        greetings
            .choose(&mut *rng)
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}
