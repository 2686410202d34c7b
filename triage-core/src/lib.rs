//! # Triage Core
//!
//! Core of the feedback triage pipeline: domain types, input normalization,
//! per-identity admission control, classification-response validation, and
//! the storage collaborator that persists validated results.
//!
//! The pipeline defends three boundaries:
//!
//! - **Caller boundary** — admission control and input bounds keep one
//!   identity from starving the rest and keep oversized/empty text out.
//! - **Model boundary** — the response validator turns free text from an
//!   unreliable external model into a closed, typed [`TriageResult`] or a
//!   named content-level error. Nothing dynamically-typed escapes it.
//! - **Storage boundary** — only fully validated results reach the
//!   [`persistence::FeedbackStore`] collaborator.
//!
//! The classification client itself lives in the `triage-llm` crate; the
//! orchestrator that sequences everything lives in `triage-pipeline`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod admission;
pub mod config;
pub mod error;
pub mod normalize;
pub mod persistence;
pub mod types;
pub mod validate;

pub use admission::AdmissionController;
pub use config::TriageConfig;
pub use error::{ErrorBody, TriageError};
pub use normalize::normalize;
pub use persistence::{FeedbackStore, SqliteStore};
pub use types::{FeedbackCategory, FeedbackRecord, TriageResult, UrgencyScore, MAX_FEEDBACK_CHARS};
pub use validate::{validate, ValidationError};
