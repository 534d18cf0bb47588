use crate::classify::{heuristic, negation, severity};
use crate::context::InferenceContext;
use crate::error::Result;
use crate::inference::is_placeholder_label;
use crate::models::{Category, Classification, IncidentReport};
use std::sync::Arc;
use tracing::{debug, warn};

/// Confidence reported for rule-based decisions (negation override and
/// heuristic substitution for an untrained model). Fixed because these
/// paths carry no learned probability.
const RULE_CONFIDENCE: f64 = 0.5;

/// Maximum summary length when falling back to the description text.
const SUMMARY_MAX_CHARS: usize = 120;

/// How the category signal was resolved for one request.
///
/// Kept explicit instead of driving fallbacks through error control
/// flow; every variant collapses to the same output shape.
#[derive(Debug, Clone, PartialEq)]
enum Signal {
    /// Negation phrase present; category forced to OTHER
    Negated,
    /// Model is the generic base checkpoint; heuristic decided
    RuleBased(Category),
    /// Model emitted a placeholder label; heuristic decided but the
    /// model's numeric confidence is kept
    Substituted { category: Category, confidence: f64 },
    /// Fine-tuned model decision taken as-is
    Model { category: Category, confidence: f64 },
}

impl Signal {
    fn into_parts(self) -> (Category, f64) {
        match self {
            Signal::Negated => (Category::Other, RULE_CONFIDENCE),
            Signal::RuleBased(category) => (category, RULE_CONFIDENCE),
            Signal::Substituted {
                category,
                confidence,
            }
            | Signal::Model {
                category,
                confidence,
            } => (category, confidence),
        }
    }
}

/// Per-request classification decision engine.
///
/// Stateless between requests; all shared inputs live in the immutable
/// [`InferenceContext`]. The public entry point is infallible: every
/// failure inside the pipeline collapses to the fixed error-fallback
/// result instead of propagating.
pub struct DecisionEngine {
    ctx: Arc<InferenceContext>,
}

impl DecisionEngine {
    pub fn new(ctx: Arc<InferenceContext>) -> Self {
        Self { ctx }
    }

    /// Classify one incident report.
    pub fn classify(&self, report: &IncidentReport) -> Classification {
        let title = report.title.trim();
        let description = report.description.trim();

        let text = format!("{} {}", title, description).trim().to_string();
        if text.is_empty() {
            return self.empty_result();
        }

        let lowered = text.to_lowercase();

        match self.decide(&lowered) {
            Ok(signal) => {
                debug!(?signal, "Resolved classification signal");
                let (category, confidence) = signal.into_parts();
                let severity_score = severity::estimate(category, &lowered);

                let summary = if title.is_empty() {
                    truncate_chars(&text, SUMMARY_MAX_CHARS)
                } else {
                    title.to_string()
                };

                Classification {
                    predicted_category: category,
                    severity_score,
                    confidence: confidence.clamp(0.0, 1.0),
                    model_version: self.ctx.model.descriptor().to_string(),
                    summary: Some(summary),
                }
            }
            Err(e) => {
                warn!(error = %e, "Classification pipeline failed, returning fallback result");
                self.error_result()
            }
        }
    }

    /// Resolve the category signal for normalized, lowercased text.
    fn decide(&self, lowered: &str) -> Result<Signal> {
        // Negation outranks every other signal.
        if negation::detect(lowered) {
            return Ok(Signal::Negated);
        }

        let model = &self.ctx.model;

        // A generic base checkpoint is defined untrustworthy for this
        // taxonomy; substitute the keyword heuristic wholesale.
        if !model.is_fine_tuned() {
            return Ok(Signal::RuleBased(heuristic::classify(
                &self.ctx.lexicon,
                lowered,
            )));
        }

        let prediction = model.predict(lowered)?;
        let confidence = prediction.confidence.clamp(0.0, 1.0);

        match model.label(prediction.label_id) {
            Some(label) if !is_placeholder_label(label) => Ok(Signal::Model {
                category: Category::parse_or_other(label),
                confidence,
            }),
            _ => Ok(Signal::Substituted {
                category: heuristic::classify(&self.ctx.lexicon, lowered),
                confidence,
            }),
        }
    }

    /// Terminal result for whitespace-only input.
    fn empty_result(&self) -> Classification {
        Classification {
            predicted_category: Category::Other,
            severity_score: 1,
            confidence: 0.0,
            model_version: format!("{}-empty", self.ctx.model.descriptor()),
            summary: Some("Empty description.".to_string()),
        }
    }

    /// Universal safety-net result; callers never observe a fault.
    fn error_result(&self) -> Classification {
        Classification {
            predicted_category: Category::Other,
            severity_score: 2,
            confidence: 0.0,
            model_version: format!("{}-error", self.ctx.model.descriptor()),
            summary: Some("Error processing request.".to_string()),
        }
    }
}

/// First `max` characters of `text`, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Lexicon;
    use crate::error::AppError;
    use crate::inference::{BaseModel, ModelAdapter, ModelPrediction};

    /// Fine-tuned stub with a fixed answer.
    struct FixedModel {
        label_id: usize,
        confidence: f64,
        labels: Vec<String>,
    }

    impl ModelAdapter for FixedModel {
        fn predict(&self, _text: &str) -> crate::error::Result<ModelPrediction> {
            Ok(ModelPrediction {
                label_id: self.label_id,
                confidence: self.confidence,
            })
        }

        fn descriptor(&self) -> &str {
            "fixed-test-model"
        }

        fn is_fine_tuned(&self) -> bool {
            true
        }

        fn label(&self, id: usize) -> Option<&str> {
            self.labels.get(id).map(String::as_str)
        }
    }

    /// Fine-tuned stub whose inference always fails.
    struct FailingModel;

    impl ModelAdapter for FailingModel {
        fn predict(&self, _text: &str) -> crate::error::Result<ModelPrediction> {
            Err(AppError::Inference("malformed tensor".to_string()))
        }

        fn descriptor(&self) -> &str {
            "failing-test-model"
        }

        fn is_fine_tuned(&self) -> bool {
            true
        }

        fn label(&self, _id: usize) -> Option<&str> {
            None
        }
    }

    fn engine_with(model: Arc<dyn ModelAdapter>) -> DecisionEngine {
        let ctx = InferenceContext::with_model(Lexicon::builtin().clone(), model);
        DecisionEngine::new(Arc::new(ctx))
    }

    fn base_engine() -> DecisionEngine {
        engine_with(Arc::new(BaseModel::new("base-test")))
    }

    #[test]
    fn test_empty_input_terminal_state() {
        let engine = base_engine();
        let result = engine.classify(&IncidentReport::new("", "   "));

        assert_eq!(result.predicted_category, Category::Other);
        assert_eq!(result.severity_score, 1);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.model_version, "base-test-empty");
        assert_eq!(result.summary.as_deref(), Some("Empty description."));
    }

    #[test]
    fn test_negation_outranks_keywords() {
        let engine = base_engine();
        let result = engine.classify(&IncidentReport::new("", "no fire here, false alarm"));

        assert_eq!(result.predicted_category, Category::Other);
        assert_eq!(result.confidence, RULE_CONFIDENCE);
    }

    #[test]
    fn test_amharic_negation() {
        let engine = base_engine();
        let result = engine.classify(&IncidentReport::new("", "እሳት የለም"));
        assert_eq!(result.predicted_category, Category::Other);
    }

    #[test]
    fn test_base_model_routes_through_heuristic() {
        let engine = base_engine();
        let result = engine.classify(&IncidentReport::new("Fire downtown", "smoke everywhere"));

        assert_eq!(result.predicted_category, Category::Fire);
        assert_eq!(result.confidence, RULE_CONFIDENCE);
        assert_eq!(result.severity_score, 3);
        assert_eq!(result.model_version, "base-test");
    }

    #[test]
    fn test_fine_tuned_label_is_used() {
        let engine = engine_with(Arc::new(FixedModel {
            label_id: 0,
            confidence: 0.93,
            labels: vec!["TRAFFIC".to_string()],
        }));
        let result = engine.classify(&IncidentReport::new("", "two cars involved"));

        assert_eq!(result.predicted_category, Category::Traffic);
        assert!((result.confidence - 0.93).abs() < 1e-9);
        assert_eq!(result.severity_score, 3);
    }

    #[test]
    fn test_placeholder_label_substitutes_heuristic() {
        let engine = engine_with(Arc::new(FixedModel {
            label_id: 0,
            confidence: 0.81,
            labels: vec!["LABEL_0".to_string()],
        }));
        let result = engine.classify(&IncidentReport::new("", "large fire at the depot"));

        // Heuristic category, but the model's numeric confidence is kept.
        assert_eq!(result.predicted_category, Category::Fire);
        assert!((result.confidence - 0.81).abs() < 1e-9);
    }

    #[test]
    fn test_missing_label_substitutes_heuristic() {
        let engine = engine_with(Arc::new(FixedModel {
            label_id: 9,
            confidence: 0.7,
            labels: vec!["FIRE".to_string()],
        }));
        let result = engine.classify(&IncidentReport::new("", "ambulance needed, injured man"));

        assert_eq!(result.predicted_category, Category::Medical);
    }

    #[test]
    fn test_inference_failure_returns_fallback() {
        let engine = engine_with(Arc::new(FailingModel));
        let result = engine.classify(&IncidentReport::new("Fire", "burning building"));

        assert_eq!(result.predicted_category, Category::Other);
        assert_eq!(result.severity_score, 2);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.model_version, "failing-test-model-error");
        assert_eq!(result.summary.as_deref(), Some("Error processing request."));
    }

    #[test]
    fn test_idempotent_for_identical_input() {
        let engine = base_engine();
        let report = IncidentReport::new("Crash", "car crash with injury");
        assert_eq!(engine.classify(&report), engine.classify(&report));
    }

    #[test]
    fn test_summary_prefers_title() {
        let engine = base_engine();
        let result = engine.classify(&IncidentReport::new("  House fire  ", "smoke visible"));
        assert_eq!(result.summary.as_deref(), Some("House fire"));
    }

    #[test]
    fn test_summary_truncates_description() {
        let engine = base_engine();
        let long = "fire ".repeat(60);
        let result = engine.classify(&IncidentReport::new("", &long));

        let summary = result.summary.unwrap();
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
    }

    #[test]
    fn test_summary_truncation_respects_amharic_boundaries() {
        let engine = base_engine();
        let long = "እሳት ".repeat(80);
        let result = engine.classify(&IncidentReport::new("", &long));

        // Must not panic on multi-byte boundaries and must stay bounded.
        assert!(result.summary.unwrap().chars().count() <= SUMMARY_MAX_CHARS);
    }

    #[test]
    fn test_severity_and_confidence_bounds() {
        let engine = base_engine();
        for text in [
            "explosion killed many people",
            "no fire",
            "",
            "ፍንዳታ ብዙ ሰዎች ተጎዱ",
            "minor scratch",
        ] {
            let result = engine.classify(&IncidentReport::new("", text));
            assert!(result.severity_score <= 5);
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }
}
