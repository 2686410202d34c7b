//! Classifier seam.
//!
//! The orchestrator talks to the classification backend through this trait,
//! so tests can script outcomes without a network. The real implementation
//! is [`ClassificationClient`] from `triage-llm`.

use std::time::Duration;

use async_trait::async_trait;

use triage_core::config::ClassifierConfig;
use triage_llm::{ClassificationClient, ClassifyError};

/// A backend that turns normalized feedback text into raw classification
/// output.
#[async_trait]
pub trait FeedbackClassifier: Send + Sync {
    /// Classify one piece of normalized feedback, returning the backend's
    /// raw textual output.
    ///
    /// # Errors
    /// Returns a [`ClassifyError`] on any channel-level failure.
    async fn classify(&self, feedback_text: &str) -> Result<String, ClassifyError>;
}

#[async_trait]
impl FeedbackClassifier for ClassificationClient {
    async fn classify(&self, feedback_text: &str) -> Result<String, ClassifyError> {
        ClassificationClient::classify(self, feedback_text).await
    }
}

/// Build a [`ClassificationClient`] from configuration plus an API key.
///
/// The key is deliberately not part of [`ClassifierConfig`]; it comes from
/// the deployment environment at construction time.
#[must_use]
pub fn client_from_config(config: &ClassifierConfig, api_key: impl Into<String>) -> ClassificationClient {
    ClassificationClient::new(config.base_url.clone(), api_key, config.model.clone())
        .with_timeout(Duration::from_millis(config.request_timeout_ms))
        .with_max_response_tokens(config.max_response_tokens)
        .with_temperature(config.temperature)
}
