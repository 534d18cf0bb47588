use crate::error::{AppError, Result};
use crate::inference::{ModelAdapter, ModelPrediction};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Serialized model artifact written by the training pipeline.
///
/// A TF-IDF vocabulary plus one linear scoring row per label; inference
/// is featurize, score, softmax. Shapes are validated at load time so a
/// corrupt artifact fails startup into the base-model fallback instead of
/// failing requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Version tag, surfaced as `model_version`
    pub version: String,

    /// Vocabulary terms, index-aligned with `idf` and weight columns
    pub vocabulary: Vec<String>,

    /// Inverse document frequency per vocabulary term
    pub idf: Vec<f64>,

    /// Semantic label per class row (category tags for a fine-tuned
    /// artifact, "LABEL_n" placeholders for a misused base checkpoint)
    pub labels: Vec<String>,

    /// One weight row per label
    pub weights: Vec<Vec<f64>>,

    /// One bias term per label
    pub bias: Vec<f64>,
}

impl ModelArtifact {
    fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(AppError::Validation(
                "model artifact has no labels".to_string(),
            ));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(AppError::Validation(format!(
                "idf length {} does not match vocabulary length {}",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if self.weights.len() != self.labels.len() || self.bias.len() != self.labels.len() {
            return Err(AppError::Validation(format!(
                "expected {} weight rows and bias terms, got {} and {}",
                self.labels.len(),
                self.weights.len(),
                self.bias.len()
            )));
        }
        for (i, row) in self.weights.iter().enumerate() {
            if row.len() != self.vocabulary.len() {
                return Err(AppError::Validation(format!(
                    "weight row {} has length {}, expected {}",
                    i,
                    row.len(),
                    self.vocabulary.len()
                )));
            }
        }
        Ok(())
    }
}

/// Fine-tuned local model: TF-IDF featurization plus linear scoring.
pub struct TfidfModel {
    version: String,
    labels: Vec<String>,
    vocab_index: HashMap<String, usize>,
    idf: Array1<f64>,
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl TfidfModel {
    /// Load and validate an artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .map_err(|e| AppError::Serialization(format!("invalid model artifact: {}", e)))?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;

        let n_labels = artifact.labels.len();
        let n_features = artifact.vocabulary.len();

        let vocab_index = artifact
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        let weights = Array2::from_shape_vec(
            (n_labels, n_features),
            artifact.weights.into_iter().flatten().collect(),
        )
        .map_err(|e| AppError::Internal(format!("failed to build weight matrix: {}", e)))?;

        Ok(Self {
            version: artifact.version,
            labels: artifact.labels,
            vocab_index,
            idf: Array1::from(artifact.idf),
            weights,
            bias: Array1::from(artifact.bias),
        })
    }

    /// TF-IDF feature vector for `text`; request-scoped buffer.
    fn featurize(&self, text: &str) -> Array1<f64> {
        let lowered = text.to_lowercase();
        let mut features = Array1::zeros(self.vocab_index.len());
        for token in tokenize(&lowered) {
            if let Some(&idx) = self.vocab_index.get(token) {
                features[idx] += 1.0;
            }
        }
        features *= &self.idf;

        let norm = features.dot(&features).sqrt();
        if norm > 0.0 {
            features /= norm;
        }
        features
    }
}

impl ModelAdapter for TfidfModel {
    fn predict(&self, text: &str) -> Result<ModelPrediction> {
        let features = self.featurize(text);
        let scores = self.weights.dot(&features) + &self.bias;

        let proba = softmax(&scores);
        let (label_id, confidence) = proba
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| AppError::Inference("model produced no scores".to_string()))?;

        Ok(ModelPrediction {
            label_id,
            confidence,
        })
    }

    fn descriptor(&self) -> &str {
        &self.version
    }

    fn is_fine_tuned(&self) -> bool {
        true
    }

    fn label(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }
}

/// Split on non-alphanumeric boundaries; works for both Latin and
/// Ethiopic script since both are alphabetic to `char::is_alphanumeric`.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

fn softmax(scores: &Array1<f64>) -> Array1<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Array1<f64> = scores.mapv(|s| (s - max).exp());
    let sum = exp.sum();
    exp / sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_artifact() -> ModelArtifact {
        ModelArtifact {
            version: "tfidf-lr-test".to_string(),
            vocabulary: vec!["fire".to_string(), "theft".to_string()],
            idf: vec![1.0, 1.0],
            labels: vec!["FIRE".to_string(), "CRIME".to_string()],
            weights: vec![vec![2.0, -1.0], vec![-1.0, 2.0]],
            bias: vec![0.0, 0.0],
        }
    }

    #[test]
    fn test_predict_picks_matching_class() {
        let model = TfidfModel::from_artifact(toy_artifact()).unwrap();

        let fire = model.predict("fire in the building").unwrap();
        assert_eq!(model.label(fire.label_id), Some("FIRE"));
        assert!(fire.confidence > 0.5 && fire.confidence <= 1.0);

        let crime = model.predict("theft at the shop").unwrap();
        assert_eq!(model.label(crime.label_id), Some("CRIME"));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let model = TfidfModel::from_artifact(toy_artifact()).unwrap();
        let a = model.predict("fire and theft").unwrap();
        let b = model.predict("fire and theft").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shape_validation_rejects_mismatched_rows() {
        let mut artifact = toy_artifact();
        artifact.weights.pop();
        assert!(TfidfModel::from_artifact(artifact).is_err());

        let mut artifact = toy_artifact();
        artifact.idf.push(1.0);
        assert!(TfidfModel::from_artifact(artifact).is_err());
    }

    #[test]
    fn test_tokenize_handles_amharic() {
        let tokens: Vec<&str> = tokenize("በቦሌ እሳት ተነስቷል!").collect();
        assert_eq!(tokens, vec!["በቦሌ", "እሳት", "ተነስቷል"]);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let scores = Array1::from(vec![1.0, 2.0, 3.0]);
        let proba = softmax(&scores);
        assert!((proba.sum() - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }
}
