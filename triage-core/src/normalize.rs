//! Input text normalization.
//!
//! Free-text feedback is trimmed, internal whitespace runs are collapsed to
//! single spaces, and the length bound is enforced. Only the normalized form
//! ever reaches the classifier or storage.

use crate::error::{Result, TriageError};
use crate::types::MAX_FEEDBACK_CHARS;

/// Normalize raw feedback text.
///
/// Rejects inputs longer than [`MAX_FEEDBACK_CHARS`] characters before doing
/// any other work, then trims and collapses whitespace. An input that is
/// empty after normalization is rejected.
///
/// Idempotent: normalizing an already-normalized string is a no-op.
///
/// # Errors
///
/// Returns [`TriageError::InvalidInput`] for over-length or
/// empty/whitespace-only input.
pub fn normalize(text: &str) -> Result<String> {
    let char_count = text.chars().count();
    if char_count > MAX_FEEDBACK_CHARS {
        return Err(TriageError::InvalidInput(format!(
            "feedback text exceeds maximum length of {MAX_FEEDBACK_CHARS} characters \
             (got {char_count})"
        )));
    }

    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(TriageError::InvalidInput(
            "feedback text cannot be empty or whitespace only".to_string(),
        ));
    }

    Ok(normalized)
}
