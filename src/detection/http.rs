//! HTTP language classifier
//!
//! Talks to a hosted text-classification model (Hugging Face Inference API
//! or anything compatible): `POST {endpoint}` with `{"inputs": text}`.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::error::{Result, TtsError};
use crate::detection::classifier::{ClassifierLoader, LanguageClassifier};
use crate::server::config::ClassifierConfig;

const WARM_UP_TEXT: &str = "Sawubona, unjani?";

/// Builds an [`HttpClassifier`] from configuration
pub struct HttpClassifierLoader {
    config: ClassifierConfig,
}

impl HttpClassifierLoader {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ClassifierLoader for HttpClassifierLoader {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn load(&self) -> Result<Arc<dyn LanguageClassifier>> {
        let endpoint = Url::parse(&self.config.endpoint).map_err(|e| unavailable(format!(
            "invalid classifier endpoint '{}': {}",
            self.config.endpoint, e
        )))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(unavailable(format!(
                "classifier endpoint must be http(s): {}",
                endpoint
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| unavailable(format!("failed to create HTTP client: {}", e)))?;

        let classifier = HttpClassifier {
            client,
            endpoint,
            api_token: self.config.api_token.clone(),
            model: self.config.model.clone(),
        };

        if self.config.warm_up {
            classifier
                .classify(WARM_UP_TEXT)
                .await
                .map_err(|e| unavailable(format!("warm-up failed: {}", e)))?;
            debug!(model = %classifier.model, "Classifier warm-up succeeded");
        }

        info!(model = %classifier.model, endpoint = %classifier.endpoint, "Language classifier ready");
        Ok(Arc::new(classifier))
    }
}

/// Classifier behind an inference endpoint
pub struct HttpClassifier {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
    model: String,
}

#[async_trait]
impl LanguageClassifier for HttpClassifier {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str) -> Result<Value> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "inputs": text }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TtsError::classifier(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::classifier(format!("HTTP {}: {}", status, body.trim())));
        }

        response
            .json()
            .await
            .map_err(|e| TtsError::classifier(format!("invalid response: {}", e)))
    }
}

fn unavailable(message: String) -> TtsError {
    TtsError::ClassifierUnavailable { message }
}
