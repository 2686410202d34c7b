//! Triage orchestrator — the request state machine.
//!
//! One linear pass with short-circuit on failure:
//! admission → normalization → classification → validation → persistence.
//! Every failure maps to one variant of the stable error taxonomy; no
//! partial result is ever returned. Persistence is best-effort: a storage
//! failure after a successful classification is logged and the caller still
//! receives the result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use triage_core::admission::AdmissionController;
use triage_core::error::TriageError;
use triage_core::normalize::normalize;
use triage_core::persistence::FeedbackStore;
use triage_core::types::TriageResult;
use triage_core::validate::validate;

use crate::classify::FeedbackClassifier;

/// Message returned to callers when the classification channel fails. The
/// concrete failure stays in the logs.
const UNAVAILABLE_MESSAGE: &str =
    "the classification service did not produce a response; please try again later";

/// Sequences one feedback submission through the full triage pipeline.
pub struct TriageOrchestrator {
    admission: AdmissionController,
    classifier: Arc<dyn FeedbackClassifier>,
    store: Arc<dyn FeedbackStore>,
}

impl TriageOrchestrator {
    /// Create an orchestrator from its three collaborators.
    #[must_use]
    pub fn new(
        admission: AdmissionController,
        classifier: Arc<dyn FeedbackClassifier>,
        store: Arc<dyn FeedbackStore>,
    ) -> Self {
        Self {
            admission,
            classifier,
            store,
        }
    }

    /// The admission controller, for inspection of counters.
    #[must_use]
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// Run one submission through the pipeline.
    ///
    /// On success the validated [`TriageResult`] is returned and a record is
    /// handed to the storage collaborator together with the caller identity
    /// and the elapsed time from admission to validation. Persistence
    /// failure does not downgrade the response.
    ///
    /// # Errors
    ///
    /// - [`TriageError::RateLimited`] — the identity exceeded its window.
    /// - [`TriageError::InvalidInput`] — empty, whitespace-only, or
    ///   over-length text.
    /// - [`TriageError::ClassificationUnavailable`] — channel failure
    ///   (timeout, transport, empty response).
    /// - [`TriageError::InvalidClassification`] — the backend answered with
    ///   invalid content.
    pub async fn handle(&self, raw_text: &str, identity: &str) -> Result<TriageResult, TriageError> {
        let start = Instant::now();

        if !self.admission.admit(identity) {
            // Denials are routine traffic, not errors.
            debug!(identity, "admission denied");
            return Err(TriageError::RateLimited {
                retry_after_secs: self.admission.retry_after_secs(),
            });
        }

        let normalized = normalize(raw_text)?;

        let preview: String = normalized.chars().take(50).collect();
        info!(identity, text = %preview, "processing feedback triage");

        let raw_response = match self.classifier.classify(&normalized).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(identity, error = %e, "classification channel failure");
                return Err(TriageError::ClassificationUnavailable(
                    UNAVAILABLE_MESSAGE.to_string(),
                ));
            }
        };

        let result = validate(&raw_response, &normalized).map_err(|e| {
            warn!(identity, error = %e, "classification response failed validation");
            TriageError::from(e)
        })?;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        if let Err(e) =
            self.store
                .create_feedback_record(&result, Some(identity), Some(elapsed_ms))
        {
            // Best-effort persistence: the classification result is the
            // primary deliverable.
            error!(identity, error = %e, "failed to persist triage result");
        }

        info!(
            identity,
            category = %result.category,
            urgency = %result.urgency_score,
            elapsed_ms,
            "triage completed"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for TriageOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageOrchestrator")
            .field("admission", &self.admission)
            .finish_non_exhaustive()
    }
}
