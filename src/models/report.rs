use crate::models::Category;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single inbound incident report.
///
/// Free text, any language or mixed English/Amharic. Constructed per
/// request and discarded after the response is produced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IncidentReport {
    /// Short human-entered headline (may be empty)
    #[serde(default)]
    #[validate(length(max = 500))]
    pub title: String,

    /// Detailed free-text description (may be empty)
    #[serde(default)]
    #[validate(length(max = 10_000))]
    pub description: String,
}

impl IncidentReport {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// The final classification decision for one report.
///
/// Produced once per request and never mutated afterwards. Invariants:
/// `severity_score` is in [0,5] and `confidence` in [0.0, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// One of the six taxonomy categories
    pub predicted_category: Category,

    /// Triage severity, 0 (informational) to 5 (mass casualty)
    pub severity_score: u8,

    /// Probability-like confidence in the predicted category
    pub confidence: f64,

    /// Identifier of the model (or rule path) that produced the decision
    pub model_version: String,

    /// Short human-readable summary for list views
    pub summary: Option<String>,
}
