//! # triage-llm — Classification Client for Feedback Triage
//!
//! The one crate that talks to the external language model. It owns:
//!
//! - the fixed classification prompt (category definitions, urgency scale,
//!   worked examples) as a reviewed constant,
//! - the bounded HTTP call (hard timeout, response size cap, low sampling
//!   temperature),
//! - the channel-level error taxonomy (timeout, backend unavailable, empty
//!   response).
//!
//! It deliberately does NOT interpret the model's answer. The raw text goes
//! back to the caller; parsing and semantic validation happen in
//! `triage-core`, behind a closed sum type. That split keeps "could not talk
//! to the model" and "the model said something invalid" as distinct failures
//! all the way to the caller.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod prompt;

pub use client::ClassificationClient;
pub use error::ClassifyError;
