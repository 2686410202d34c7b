//! Channel-level classification errors.
//!
//! Everything here describes a failure to *obtain* a response from the
//! classification backend. Failures in the *content* of a response are the
//! response validator's business, not this crate's.

use thiserror::Error;

/// Errors from the channel to the classification backend.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The call exceeded the hard timeout. Not retried automatically; the
    /// caller may resubmit.
    #[error("classification request timed out after {0}ms")]
    Timeout(u64),

    /// Transport failure or a non-success backend status.
    #[error("classification backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered, but with no textual content.
    #[error("empty response from classification backend")]
    EmptyResponse,
}
