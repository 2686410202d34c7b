//! Error taxonomy for the triage pipeline.
//!
//! Channel-level failures (could not talk to the classification backend) and
//! content-level failures (the backend answered, but with something invalid)
//! are kept distinct: the former map to 500, the latter to 400, matching the
//! inbound surface contract.

use serde::Serialize;
use thiserror::Error;

use crate::validate::ValidationError;

/// Top-level error type for all triage operations.
#[derive(Debug, Error)]
pub enum TriageError {
    /// The caller exceeded their admission window.
    #[error("Too many requests. Please wait before trying again.")]
    RateLimited {
        /// Seconds the caller should wait before retrying.
        retry_after_secs: u64,
    },

    /// The submitted feedback text was rejected before classification.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The classification backend could not be reached, timed out, or
    /// returned nothing. Channel-level; the detail stays in the logs.
    #[error("Classification service unavailable: {0}")]
    ClassificationUnavailable(String),

    /// The classification backend answered with invalid content.
    #[error("Invalid classification: {0}")]
    InvalidClassification(#[from] ValidationError),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TriageError {
    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limit_exceeded",
            Self::InvalidInput(_) => "invalid_input",
            Self::ClassificationUnavailable(_) => "classification_unavailable",
            Self::InvalidClassification(_) => "invalid_classification",
            Self::Database(_) => "storage_error",
            Self::Config(_) => "config_error",
            Self::Io(_) => "io_error",
        }
    }

    /// HTTP-style status mapping for the inbound surface.
    ///
    /// Validation failures (input and classification content) are client
    /// errors; channel and storage failures are server errors.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RateLimited { .. } => 429,
            Self::InvalidInput(_) | Self::InvalidClassification(_) => 400,
            Self::ClassificationUnavailable(_)
            | Self::Database(_)
            | Self::Config(_)
            | Self::Io(_) => 500,
        }
    }

    /// Retry hint, present only for rate-limit denials.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// The structured body the inbound surface returns for this error.
    #[must_use]
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code(),
            message: self.to_string(),
            status_code: self.status_code(),
            retry_after_secs: self.retry_after_secs(),
        }
    }
}

/// Serializable error payload for callers.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Stable error code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
    /// HTTP-style status.
    pub status_code: u16,
    /// Retry hint in seconds, for rate-limit denials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_surface_contract() {
        assert_eq!(
            TriageError::RateLimited { retry_after_secs: 60 }.status_code(),
            429
        );
        assert_eq!(TriageError::InvalidInput("empty".into()).status_code(), 400);
        assert_eq!(
            TriageError::InvalidClassification(ValidationError::Malformed(
                "not JSON".into()
            ))
            .status_code(),
            400
        );
        assert_eq!(
            TriageError::ClassificationUnavailable("timeout".into()).status_code(),
            500
        );
    }

    #[test]
    fn rate_limit_carries_retry_hint() {
        let err = TriageError::RateLimited { retry_after_secs: 60 };
        assert_eq!(err.retry_after_secs(), Some(60));

        let body = err.to_error_body();
        assert_eq!(body.error, "rate_limit_exceeded");
        assert_eq!(body.status_code, 429);
        assert_eq!(body.retry_after_secs, Some(60));
        assert!(body.message.contains("Too many requests"));
    }

    #[test]
    fn non_rate_limit_errors_have_no_retry_hint() {
        assert_eq!(
            TriageError::InvalidInput("too long".into()).retry_after_secs(),
            None
        );
    }
}
