//! Classification client — one bounded chat-completion call per request.
//!
//! The client builds the fixed prompt, invokes an OpenAI-compatible backend
//! with a hard timeout, a response size cap, and low temperature, and hands
//! back the raw textual content. It never parses that content; the response
//! validator owns everything past the channel.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::ClassifyError;
use crate::prompt::build_classification_prompt;

/// Default hard timeout for a classification call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default response size cap in tokens.
pub const DEFAULT_MAX_RESPONSE_TOKENS: u32 = 100;
/// Default sampling temperature. Low, to favor determinism.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Client for the external classification backend.
pub struct ClassificationClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    max_response_tokens: u32,
    temperature: f64,
}

impl ClassificationClient {
    /// Create a client against an OpenAI-compatible API.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
            max_response_tokens: DEFAULT_MAX_RESPONSE_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the hard timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the response size cap.
    #[must_use]
    pub fn with_max_response_tokens(mut self, max_response_tokens: u32) -> Self {
        self.max_response_tokens = max_response_tokens;
        self
    }

    /// Override the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// The model identifier sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Classify one piece of normalized feedback.
    ///
    /// Returns the backend's raw textual content. There is no automatic
    /// retry: a timeout or transport failure surfaces to the caller, who may
    /// resubmit.
    ///
    /// # Errors
    ///
    /// - [`ClassifyError::Timeout`] — the hard timeout elapsed.
    /// - [`ClassifyError::Unavailable`] — transport failure, non-success
    ///   status, or an unreadable response body.
    /// - [`ClassifyError::EmptyResponse`] — no textual content in an
    ///   otherwise well-formed response.
    pub async fn classify(&self, feedback_text: &str) -> Result<String, ClassifyError> {
        let prompt = build_classification_prompt(feedback_text);
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt },
            ],
            "max_completion_tokens": self.max_response_tokens,
            "temperature": self.temperature,
        });

        let start = Instant::now();
        let result = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "classification request timed out");
                return Err(ClassifyError::Timeout(self.timeout.as_millis() as u64));
            }
            Err(e) => {
                warn!(error = %e, "classification request failed");
                return Err(ClassifyError::Unavailable(e.to_string()));
            }
        };

        if !resp.status().is_success() {
            let status = resp.status();
            warn!(%status, latency_ms, "classification backend returned error status");
            return Err(ClassifyError::Unavailable(format!("HTTP {status}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClassifyError::Unavailable(format!("unreadable response body: {e}")))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .unwrap_or("");

        if content.is_empty() {
            warn!(latency_ms, "classification backend returned no content");
            return Err(ClassifyError::EmptyResponse);
        }

        debug!(latency_ms, model = %self.model, "classification response received");
        Ok(content.to_string())
    }
}

impl std::fmt::Debug for ClassificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
