use crate::classify::Lexicon;
use crate::config::Config;
use crate::inference::{self, ModelAdapter};
use crate::models::ModelMetadata;
use std::path::Path;
use std::sync::Arc;

/// Process-wide read-only inference state.
///
/// Constructed once at startup and shared by reference into every request
/// handler; nothing here mutates afterwards, so concurrent requests read
/// without locking. Reloading the lexicon or model requires a fresh
/// context (process restart).
pub struct InferenceContext {
    /// Keyword lexicon (loaded document or built-in fallback)
    pub lexicon: Lexicon,

    /// Loaded model adapter (fine-tuned artifact or generic base stand-in)
    pub model: Arc<dyn ModelAdapter>,

    /// Training metadata sidecar, republished via the health endpoint
    pub metadata: Option<ModelMetadata>,
}

impl InferenceContext {
    /// Build the context from configuration.
    ///
    /// Degrades gracefully on every input: a missing lexicon falls back to
    /// built-in keywords and a missing artifact to the base model, so
    /// startup never fails on absent data files.
    pub fn from_config(config: &Config) -> Self {
        let lexicon = Lexicon::load_or_builtin(Path::new(&config.lexicon.path));
        let model = inference::load_model(&config.model);
        let metadata = ModelMetadata::load_optional(Path::new(&config.model.metadata_path));

        Self {
            lexicon,
            model,
            metadata,
        }
    }

    /// Build a context around an explicit adapter (used by tests and the
    /// evaluation CLI).
    pub fn with_model(lexicon: Lexicon, model: Arc<dyn ModelAdapter>) -> Self {
        Self {
            lexicon,
            model,
            metadata: None,
        }
    }
}
