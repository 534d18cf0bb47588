/// Model inference adapter boundary
///
/// The decision engine only talks to [`ModelAdapter`]; whether the loaded
/// weights are a fine-tuned local artifact or a generic base stand-in is
/// resolved once at startup.

pub mod tfidf;

pub use tfidf::TfidfModel;

use crate::config::ModelConfig;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// A single model prediction: top label id and its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrediction {
    pub label_id: usize,
    pub confidence: f64,
}

/// Opaque sequence-classification model.
///
/// Implementations must be safe to call from concurrent requests; all
/// working buffers are request-scoped.
pub trait ModelAdapter: Send + Sync {
    /// Predict the top label for `text`.
    fn predict(&self, text: &str) -> Result<ModelPrediction>;

    /// Identifier of the loaded weights, used as `model_version`.
    fn descriptor(&self) -> &str;

    /// Whether the weights were fine-tuned for this taxonomy.
    ///
    /// Output of a non-fine-tuned model is defined untrustworthy and must
    /// not be surfaced directly.
    fn is_fine_tuned(&self) -> bool;

    /// Semantic label for a label id, if the model has one.
    fn label(&self, id: usize) -> Option<&str>;
}

/// True for labels a plain base checkpoint emits when misused for
/// classification ("LABEL_0", "LABEL_1", ...).
pub fn is_placeholder_label(label: &str) -> bool {
    label.starts_with("LABEL_")
}

/// Generic un-fine-tuned base model stand-in.
///
/// Used when no trained artifact is available; it only exists so the
/// decision engine has a uniform adapter to interrogate. Its labels are
/// placeholders and `is_fine_tuned` is false, which routes every request
/// through the keyword heuristic.
pub struct BaseModel {
    descriptor: String,
    labels: Vec<String>,
}

impl BaseModel {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            labels: (0..2).map(|i| format!("LABEL_{}", i)).collect(),
        }
    }
}

impl ModelAdapter for BaseModel {
    fn predict(&self, _text: &str) -> Result<ModelPrediction> {
        // Uniform over the placeholder binary head; callers must not
        // surface this directly.
        Ok(ModelPrediction {
            label_id: 0,
            confidence: 0.5,
        })
    }

    fn descriptor(&self) -> &str {
        &self.descriptor
    }

    fn is_fine_tuned(&self) -> bool {
        false
    }

    fn label(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }
}

/// Load the configured model artifact, degrading to the generic base
/// stand-in when the artifact is missing or unreadable.
pub fn load_model(config: &ModelConfig) -> Arc<dyn ModelAdapter> {
    let path = Path::new(&config.artifact_path);
    match TfidfModel::load(path) {
        Ok(model) => {
            tracing::info!(
                descriptor = model.descriptor(),
                path = %path.display(),
                "Loaded fine-tuned model artifact"
            );
            Arc::new(model)
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "No usable model artifact, falling back to generic base model"
            );
            Arc::new(BaseModel::new(config.base_descriptor.clone()))
        }
    }
}
