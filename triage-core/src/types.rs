//! Core domain types for the feedback triage pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted feedback length in characters (not bytes).
pub const MAX_FEEDBACK_CHARS: usize = 1000;

/// The closed set of feedback categories.
///
/// These four variants are the only values the classification backend may
/// return; anything else is rejected by the response validator. The set is
/// fixed at compile time, with no runtime extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackCategory {
    /// Identifies a technical issue or something that is broken.
    #[serde(rename = "Bug Report")]
    BugReport,
    /// Suggests a new feature or an enhancement to an existing one.
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    /// Expresses satisfaction or appreciation.
    #[serde(rename = "Praise/Positive Feedback")]
    Praise,
    /// Asks a question or provides a comment that fits none of the others.
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
}

impl FeedbackCategory {
    /// The canonical string for this category, as used on the wire and in
    /// the classification prompt.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BugReport => "Bug Report",
            Self::FeatureRequest => "Feature Request",
            Self::Praise => "Praise/Positive Feedback",
            Self::GeneralInquiry => "General Inquiry",
        }
    }

    /// All categories, in display order.
    #[must_use]
    pub fn all() -> &'static [FeedbackCategory] {
        &[
            Self::BugReport,
            Self::FeatureRequest,
            Self::Praise,
            Self::GeneralInquiry,
        ]
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackCategory {
    type Err = String;

    /// Exact, case-sensitive match against the canonical strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bug Report" => Ok(Self::BugReport),
            "Feature Request" => Ok(Self::FeatureRequest),
            "Praise/Positive Feedback" => Ok(Self::Praise),
            "General Inquiry" => Ok(Self::GeneralInquiry),
            _ => Err(format!("unknown category: '{s}'")),
        }
    }
}

/// An urgency score on the ordinal 1–5 scale.
///
/// The range is enforced at construction; a stored score is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct UrgencyScore(u8);

impl UrgencyScore {
    /// Create a score, returning `None` when outside [1,5].
    #[must_use]
    pub fn new(score: u8) -> Option<Self> {
        (1..=5).contains(&score).then_some(Self(score))
    }

    /// The raw score value.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Human-readable label for the score.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Not Urgent",
            2 => "Low",
            3 => "Medium",
            4 => "High",
            _ => "Critical",
        }
    }
}

impl TryFrom<i64> for UrgencyScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("urgency score out of range: {value}"))
    }
}

impl<'de> Deserialize<'de> for UrgencyScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for UrgencyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully validated triage outcome.
///
/// Carries the *normalized* feedback text (never the raw input) together
/// with a category from the closed set and an in-range urgency score. Built
/// by the response validator; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    /// Normalized feedback text.
    pub feedback_text: String,
    /// Assigned category.
    pub category: FeedbackCategory,
    /// Assigned urgency.
    pub urgency_score: UrgencyScore,
}

/// A persisted feedback row, as returned by the storage collaborator.
///
/// This is the shape the dashboard/read layer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Row id.
    pub id: i64,
    /// Normalized feedback text.
    pub feedback_text: String,
    /// Assigned category.
    pub category: FeedbackCategory,
    /// Assigned urgency.
    pub urgency_score: UrgencyScore,
    /// Caller identity at submission time, if known.
    pub client_ip: Option<String>,
    /// End-to-end processing time for the triage request.
    pub processing_time_ms: Option<f64>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
