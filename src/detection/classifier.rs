//! Classifier interface and output normalization
//!
//! Text-classification services disagree on output shape. Everything they
//! return is flattened into a list of [`Prediction`]s on a 0-100 scale,
//! best first.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::core::error::Result;

/// One `(label, score)` pair, score in `[0, 100]`
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// A loaded language classifier
#[async_trait]
pub trait LanguageClassifier: Send + Sync {
    /// Model name reported in detection results
    fn model_name(&self) -> &str;

    /// Classify `text`, returning the raw JSON output
    async fn classify(&self, text: &str) -> Result<Value>;
}

/// Produces the classifier on first use
#[async_trait]
pub trait ClassifierLoader: Send + Sync {
    /// Model name, known before loading
    fn model_name(&self) -> &str;

    async fn load(&self) -> Result<Arc<dyn LanguageClassifier>>;
}

/// Flatten raw classifier output into predictions, best first.
///
/// Accepted shapes:
///
/// ```text
/// [[{"label": "zu", "score": 0.9}, ...]]
/// [{"label": "zu", "score": 0.9}, ...]
/// {"labels": ["zu", ...], "scores": [0.9, ...]}
/// {"label": "zu", "score": 0.9}
/// ```
///
/// Entries without a string label or a finite numeric score are dropped.
/// Scores up to 1.0 are treated as probabilities and scaled to percent.
pub fn normalize_predictions(raw: &Value) -> Vec<Prediction> {
    let mut predictions = Vec::new();

    match raw {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(inner) => {
                        predictions.extend(inner.iter().filter_map(prediction_from_object))
                    }
                    other => predictions.extend(prediction_from_object(other)),
                }
            }
        }
        Value::Object(map) => {
            if let (Some(Value::Array(labels)), Some(Value::Array(scores))) =
                (map.get("labels"), map.get("scores"))
            {
                predictions.extend(
                    labels
                        .iter()
                        .zip(scores)
                        .filter_map(|(label, score)| prediction(label, score)),
                );
            } else {
                predictions.extend(prediction_from_object(raw));
            }
        }
        _ => {}
    }

    // Stable, so equal scores keep the classifier's order
    predictions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    predictions
}

fn prediction_from_object(value: &Value) -> Option<Prediction> {
    let map = value.as_object()?;
    prediction(map.get("label")?, map.get("score")?)
}

fn prediction(label: &Value, score: &Value) -> Option<Prediction> {
    let label = label.as_str()?;
    let score = score.as_f64().filter(|s| s.is_finite())?;
    Some(Prediction {
        label: label.to_string(),
        score: scale_score(score),
    })
}

fn scale_score(score: f64) -> f64 {
    let percent = if score <= 1.0 { score * 100.0 } else { score };
    percent.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(predictions: &[Prediction]) -> Vec<&str> {
        predictions.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn test_nested_list() {
        let raw = json!([[{"label": "en", "score": 0.1}, {"label": "zu", "score": 0.85}]]);
        let predictions = normalize_predictions(&raw);
        assert_eq!(labels(&predictions), vec!["zu", "en"]);
        assert!((predictions[0].score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_list() {
        let raw = json!([{"label": "xh", "score": 0.4}, {"label": "af", "score": 0.6}]);
        assert_eq!(labels(&normalize_predictions(&raw)), vec!["af", "xh"]);
    }

    #[test]
    fn test_parallel_arrays() {
        let raw = json!({"labels": ["tn", "st", "nso"], "scores": [0.2, 0.7, 0.1]});
        assert_eq!(labels(&normalize_predictions(&raw)), vec!["st", "tn", "nso"]);
    }

    #[test]
    fn test_single_object() {
        let raw = json!({"label": "__label__ve", "score": 0.99});
        let predictions = normalize_predictions(&raw);
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].label, "__label__ve");
    }

    #[test]
    fn test_percent_scores_and_clamping() {
        let raw = json!([
            {"label": "a", "score": 42.5},
            {"label": "b", "score": 250},
            {"label": "c", "score": -0.5}
        ]);
        let scores: Vec<f64> = normalize_predictions(&raw).iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![100.0, 42.5, 0.0]);
    }

    #[test]
    fn test_malformed_entries_dropped() {
        let raw = json!([
            {"label": "zu"},
            {"score": 0.5},
            {"label": 7, "score": 0.5},
            {"label": "xh", "score": "high"},
            "zu",
            {"label": "ss", "score": 0.3}
        ]);
        assert_eq!(labels(&normalize_predictions(&raw)), vec!["ss"]);
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(normalize_predictions(&json!(null)).is_empty());
        assert!(normalize_predictions(&json!("zu")).is_empty());
        assert!(normalize_predictions(&json!({"error": "loading"})).is_empty());
        assert!(normalize_predictions(&json!([])).is_empty());
    }

    #[test]
    fn test_ties_keep_order() {
        let raw = json!([{"label": "first", "score": 0.5}, {"label": "second", "score": 0.5}]);
        assert_eq!(labels(&normalize_predictions(&raw)), vec!["first", "second"]);
    }
}
