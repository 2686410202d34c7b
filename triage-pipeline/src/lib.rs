//! # triage-pipeline — Feedback Triage Orchestration
//!
//! Wires the pieces from `triage-core` and `triage-llm` into the request
//! pipeline:
//!
//! ```text
//! submit(text, identity)
//!     │
//!     ▼
//! AdmissionController ── deny ──▶ RateLimited (retry hint)
//!     │
//!     ▼
//! normalize ──────────── fail ──▶ InvalidInput
//!     │
//!     ▼
//! FeedbackClassifier ─── fail ──▶ ClassificationUnavailable
//!     │
//!     ▼
//! validate ───────────── fail ──▶ InvalidClassification
//!     │
//!     ▼
//! FeedbackStore (best-effort) ─▶ TriageResult
//! ```
//!
//! The classifier sits behind a trait so tests can script backend behavior;
//! production wiring uses [`ClassificationClient`](triage_llm::ClassificationClient)
//! via [`classify::client_from_config`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod orchestrator;

pub use classify::{client_from_config, FeedbackClassifier};
pub use orchestrator::TriageOrchestrator;
