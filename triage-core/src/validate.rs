//! Classification response validation.
//!
//! The classification backend produces free text that should contain a JSON
//! object with a category and an urgency score. This module extracts that
//! object, parses it, and semantically validates it into a [`TriageResult`]
//! or a specific content-level error. Everything here is pure: no I/O, no
//! clock, no shared state.

use serde_json::Value;
use thiserror::Error;

use crate::types::{FeedbackCategory, TriageResult, UrgencyScore};

/// Field name the backend must use for the category.
const CATEGORY_FIELD: &str = "category";
/// Field name the backend must use for the urgency score.
const URGENCY_FIELD: &str = "urgency_score";

/// Content-level failures of a classification response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The response was not a JSON object with the two required fields.
    #[error("malformed classification response: {0}")]
    Malformed(String),

    /// The category field value is outside the closed set.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// The urgency field value is not an integer in [1,5].
    #[error("invalid urgency score: {0}")]
    InvalidUrgency(String),
}

/// Extract the candidate JSON-object span from raw model output.
///
/// Takes the span from the first `{` to the last `}`, which tolerates models
/// that wrap the answer in explanatory prose. When no such pair exists the
/// whole text is the candidate (and will fail to parse downstream).
#[must_use]
pub fn extract_json_object(raw: &str) -> &str {
    let raw = raw.trim();
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => raw,
    }
}

/// Validate raw classification output into a [`TriageResult`].
///
/// `normalized_text` is the already-normalized feedback the result will
/// carry; this function never touches the raw user input.
///
/// # Errors
///
/// - [`ValidationError::Malformed`] — unparsable JSON, non-object JSON, or a
///   missing required field (the message names which).
/// - [`ValidationError::InvalidCategory`] — category outside the closed set
///   (comparison is exact and case-sensitive).
/// - [`ValidationError::InvalidUrgency`] — urgency that is not a JSON
///   integer in [1,5]. Numeric strings are rejected: the type must be
///   integer, not integer-like.
pub fn validate(raw: &str, normalized_text: &str) -> Result<TriageResult, ValidationError> {
    let candidate = extract_json_object(raw);

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| ValidationError::Malformed(format!("invalid JSON: {e}")))?;

    let Some(object) = value.as_object() else {
        return Err(ValidationError::Malformed(
            "classification response must be a JSON object".to_string(),
        ));
    };

    let category_value = object.get(CATEGORY_FIELD).ok_or_else(|| {
        ValidationError::Malformed(format!("missing '{CATEGORY_FIELD}' field"))
    })?;
    let urgency_value = object.get(URGENCY_FIELD).ok_or_else(|| {
        ValidationError::Malformed(format!("missing '{URGENCY_FIELD}' field"))
    })?;

    let category = category_value
        .as_str()
        .and_then(|s| s.parse::<FeedbackCategory>().ok())
        .ok_or_else(|| {
            ValidationError::InvalidCategory(format!(
                "{category_value}; must be one of: {}",
                FeedbackCategory::all()
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

    let urgency_score = urgency_value
        .as_i64()
        .ok_or(())
        .and_then(|n| UrgencyScore::try_from(n).map_err(|_| ()))
        .map_err(|()| {
            ValidationError::InvalidUrgency(format!(
                "{urgency_value}; must be an integer between 1 and 5"
            ))
        })?;

    Ok(TriageResult {
        feedback_text: normalized_text.to_string(),
        category,
        urgency_score,
    })
}
