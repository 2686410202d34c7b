//! Configuration for the triage pipeline.
//!
//! Loadable from TOML. Every behavioral switch lives here as an explicit
//! field; nothing in the pipeline inspects the environment at runtime.

use serde::{Deserialize, Serialize};

/// Top-level triage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Admission control settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Classification backend settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Storage settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl TriageConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `TriageError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::TriageError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Admission control (rate limiting) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per identity per window.
    #[serde(default = "default_10")]
    pub max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_60")]
    pub window_seconds: u64,
    /// Admit everything without recording. For non-production test runs
    /// only; an explicit flag, never environment inspection.
    #[serde(default)]
    pub bypass: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_seconds: 60,
            bypass: false,
        }
    }
}

/// Classification backend settings.
///
/// API keys are supplied at client construction, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Model identifier sent to the backend.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Hard timeout for a classification call in milliseconds.
    #[serde(default = "default_30000")]
    pub request_timeout_ms: u64,
    /// Response size cap in tokens.
    #[serde(default = "default_100")]
    pub max_response_tokens: u32,
    /// Sampling temperature. Kept low to favor determinism.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "o4-mini-2025-04-16".to_string(),
            base_url: "https://api.openai.com".to_string(),
            request_timeout_ms: 30_000,
            max_response_tokens: 100,
            temperature: 0.3,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Use WAL mode for concurrent reads.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_5000")]
    pub busy_timeout_ms: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            wal_mode: true,
            busy_timeout_ms: 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_model() -> String { "o4-mini-2025-04-16".to_string() }
fn default_base_url() -> String { "https://api.openai.com".to_string() }
fn default_temperature() -> f64 { 0.3 }
fn default_10() -> u32 { 10 }
fn default_60() -> u64 { 60 }
fn default_100() -> u32 { 100 }
fn default_5000() -> u32 { 5000 }
fn default_30000() -> u64 { 30_000 }
