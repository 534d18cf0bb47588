use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Training metadata sidecar written by the training pipeline.
///
/// The service only reads and republishes this through the health
/// endpoint; it never computes or updates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Version tag of the trained artifact (e.g. "tfidf-lr-v3")
    pub version: String,

    /// When training completed
    pub trained_at: DateTime<Utc>,

    /// Number of training samples
    pub n_samples: usize,

    /// Overall training accuracy
    pub accuracy: f64,

    /// Per-language evaluation metrics, keyed by language code ("en", "am")
    #[serde(default)]
    pub per_language: HashMap<String, LanguageMetrics>,
}

/// Evaluation metrics for one language slice of the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageMetrics {
    pub samples: usize,
    pub accuracy: f64,
}

impl ModelMetadata {
    /// Load the sidecar from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let metadata: ModelMetadata = serde_json::from_str(&raw)
            .map_err(|e| AppError::Serialization(format!("invalid model metadata: {}", e)))?;
        Ok(metadata)
    }

    /// Load the sidecar, returning None (with a warning) when missing or malformed.
    pub fn load_optional(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "No usable model metadata sidecar");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_metadata_sidecar() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version":"tfidf-lr-v2","trained_at":"2025-11-03T08:00:00Z","n_samples":1200,"accuracy":0.91,"per_language":{{"am":{{"samples":400,"accuracy":0.87}}}}}}"#
        )
        .unwrap();

        let metadata = ModelMetadata::load(file.path()).unwrap();
        assert_eq!(metadata.version, "tfidf-lr-v2");
        assert_eq!(metadata.n_samples, 1200);
        assert_eq!(metadata.per_language["am"].samples, 400);
    }

    #[test]
    fn test_load_optional_missing_file() {
        assert!(ModelMetadata::load_optional(Path::new("/nonexistent/metadata.json")).is_none());
    }
}
