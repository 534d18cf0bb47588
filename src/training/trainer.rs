use crate::error::{AppError, Result};
use crate::inference::tfidf::{tokenize, ModelArtifact};
use crate::inference::{ModelAdapter, TfidfModel};
use crate::models::{LanguageMetrics, ModelMetadata};
use crate::training::dataset::{is_amharic, TrainingExample};
use chrono::Utc;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use std::collections::HashMap;

/// Training options for the TF-IDF logistic-regression pipeline.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Version tag written into the artifact and metadata
    pub version: String,

    /// Maximum vocabulary size
    pub max_vocab_size: usize,

    /// Minimum document frequency for a term to enter the vocabulary
    pub min_doc_freq: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            version: format!("tfidf-lr-{}", Utc::now().format("%Y%m%d")),
            max_vocab_size: 2000,
            min_doc_freq: 2,
        }
    }
}

/// Train a classifier and produce the serving artifact plus the metadata
/// sidecar the health endpoint republishes.
pub fn train(
    examples: &[TrainingExample],
    options: &TrainOptions,
) -> Result<(ModelArtifact, ModelMetadata)> {
    if examples.len() < 10 {
        return Err(AppError::Validation(format!(
            "too few examples ({}) for training",
            examples.len()
        )));
    }

    // Stable label table: categories present in the dataset, sorted so
    // repeated runs over the same data produce identical artifacts.
    let mut labels: Vec<String> = Vec::new();
    for example in examples {
        let tag = example.category.to_string();
        if !labels.contains(&tag) {
            labels.push(tag);
        }
    }
    labels.sort();
    if labels.len() < 2 {
        return Err(AppError::Validation(
            "dataset must contain at least two categories".to_string(),
        ));
    }

    // Vocabulary by document frequency: drop rare terms, keep the most
    // frequent up to the cap.
    let documents: Vec<Vec<String>> = examples
        .iter()
        .map(|e| {
            let lowered = e.text.to_lowercase();
            tokenize(&lowered).map(str::to_string).collect()
        })
        .collect();

    let mut doc_freq: HashMap<String, usize> = HashMap::new();
    for tokens in &documents {
        let unique: std::collections::HashSet<&String> = tokens.iter().collect();
        for term in unique {
            *doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let mut vocab_list: Vec<(String, usize)> = doc_freq
        .into_iter()
        .filter(|(_, freq)| *freq >= options.min_doc_freq)
        .collect();
    vocab_list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    vocab_list.truncate(options.max_vocab_size);

    if vocab_list.is_empty() {
        return Err(AppError::Validation(
            "no vocabulary terms survive the document-frequency filter".to_string(),
        ));
    }

    let n_docs = examples.len() as f64;
    let vocabulary: Vec<String> = vocab_list.iter().map(|(term, _)| term.clone()).collect();
    let idf: Vec<f64> = vocab_list
        .iter()
        .map(|(_, freq)| (n_docs / (1.0 + *freq as f64)).ln() + 1.0)
        .collect();

    let vocab_index: HashMap<&str, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(i, term)| (term.as_str(), i))
        .collect();

    // TF-IDF feature rows, l2-normalized to match serving featurization.
    let n_features = vocabulary.len();
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(examples.len());
    for tokens in &documents {
        let mut row = vec![0.0; n_features];
        for token in tokens {
            if let Some(&idx) = vocab_index.get(token.as_str()) {
                row[idx] += 1.0;
            }
        }
        for (value, idf_value) in row.iter_mut().zip(&idf) {
            *value *= idf_value;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }
        rows.push(row);
    }

    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    let x = DenseMatrix::new(examples.len(), n_features, data, false);
    let y: Vec<i32> = examples
        .iter()
        .map(|e| {
            labels
                .iter()
                .position(|l| *l == e.category.to_string())
                .unwrap_or(0) as i32
        })
        .collect();

    let model = LogisticRegression::fit(&x, &y, LogisticRegressionParameters::default())
        .map_err(|e| AppError::Internal(format!("failed to train logistic regression: {}", e)))?;

    let (weights, bias) = extract_linear_head(&model, labels.len(), n_features)?;

    let artifact = ModelArtifact {
        version: options.version.clone(),
        vocabulary,
        idf,
        labels,
        weights,
        bias,
    };

    // Training accuracy via the serving-side model, so the reported number
    // reflects what the service will actually run.
    let serving_model = TfidfModel::from_artifact(artifact.clone())?;
    let metadata = build_metadata(&serving_model, examples, &options.version);

    Ok((artifact, metadata))
}

/// Pull the linear scoring head out of a fitted smartcore model.
///
/// smartcore stores multiclass coefficients as a matrix whose orientation
/// depends on the problem shape; normalize to one row per label. A binary
/// fit yields a single row, which expands to [zeros, w] since
/// softmax([0, z]) equals sigmoid(z).
fn extract_linear_head(
    model: &LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>,
    n_labels: usize,
    n_features: usize,
) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    let coef = model.coefficients();
    let intercept = model.intercept();
    let (rows, cols) = coef.shape();

    let read_row = |matrix: &DenseMatrix<f64>, row: usize, len: usize, transposed: bool| {
        (0..len)
            .map(|col| {
                if transposed {
                    *matrix.get((col, row))
                } else {
                    *matrix.get((row, col))
                }
            })
            .collect::<Vec<f64>>()
    };

    let (n_rows, transposed) = if rows == n_features && cols != n_features {
        (cols, true)
    } else {
        (rows, false)
    };

    let mut weights: Vec<Vec<f64>> = (0..n_rows)
        .map(|row| read_row(coef, row, n_features, transposed))
        .collect();
    // Intercept orientation can differ from the coefficient matrix;
    // index along whichever axis actually holds the classes.
    let (int_rows, _) = intercept.shape();
    let mut bias: Vec<f64> = (0..n_rows)
        .map(|row| {
            if int_rows >= n_rows {
                *intercept.get((row, 0))
            } else {
                *intercept.get((0, row))
            }
        })
        .collect();

    if n_rows == 1 && n_labels == 2 {
        weights.insert(0, vec![0.0; n_features]);
        bias.insert(0, 0.0);
    }

    if weights.len() != n_labels {
        return Err(AppError::Internal(format!(
            "fitted model has {} coefficient rows, expected {}",
            weights.len(),
            n_labels
        )));
    }

    Ok((weights, bias))
}

fn build_metadata(
    model: &TfidfModel,
    examples: &[TrainingExample],
    version: &str,
) -> ModelMetadata {
    let mut correct = 0usize;
    let mut per_language: HashMap<String, (usize, usize)> = HashMap::new();

    for example in examples {
        let lang = if is_amharic(&example.text) { "am" } else { "en" };
        let slot = per_language.entry(lang.to_string()).or_insert((0, 0));
        slot.0 += 1;

        let ok = model
            .predict(&example.text)
            .ok()
            .and_then(|p| model.label(p.label_id).map(str::to_string))
            .map(|label| label == example.category.to_string())
            .unwrap_or(false);
        if ok {
            correct += 1;
            slot.1 += 1;
        }
    }

    ModelMetadata {
        version: version.to_string(),
        trained_at: Utc::now(),
        n_samples: examples.len(),
        accuracy: correct as f64 / examples.len() as f64,
        per_language: per_language
            .into_iter()
            .map(|(lang, (samples, ok))| {
                (
                    lang,
                    LanguageMetrics {
                        samples,
                        accuracy: if samples > 0 {
                            ok as f64 / samples as f64
                        } else {
                            0.0
                        },
                    },
                )
            })
            .collect(),
    }
}

/// Per-category evaluation metrics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Evaluation results for a labelled dataset.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub accuracy: f64,
    pub per_category: HashMap<String, ClassMetrics>,
}

/// Run a trained artifact against a labelled set.
pub fn evaluate(model: &TfidfModel, examples: &[TrainingExample]) -> EvaluationReport {
    let predictions: Vec<String> = examples
        .iter()
        .map(|e| {
            model
                .predict(&e.text)
                .ok()
                .and_then(|p| model.label(p.label_id).map(str::to_string))
                .unwrap_or_else(|| "OTHER".to_string())
        })
        .collect();

    let truths: Vec<String> = examples.iter().map(|e| e.category.to_string()).collect();

    let correct = truths
        .iter()
        .zip(&predictions)
        .filter(|(t, p)| t == p)
        .count();

    let mut categories: Vec<String> = truths.clone();
    categories.extend(predictions.iter().cloned());
    categories.sort();
    categories.dedup();

    let mut per_category = HashMap::new();
    for category in categories {
        let tp = truths
            .iter()
            .zip(&predictions)
            .filter(|(t, p)| **t == category && **p == category)
            .count();
        let fp = predictions
            .iter()
            .zip(&truths)
            .filter(|(p, t)| **p == category && **t != category)
            .count();
        let fn_count = truths
            .iter()
            .zip(&predictions)
            .filter(|(t, p)| **t == category && **p != category)
            .count();

        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_count > 0 {
            tp as f64 / (tp + fn_count) as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let support = truths.iter().filter(|t| **t == category).count();

        per_category.insert(
            category,
            ClassMetrics {
                precision,
                recall,
                f1_score: f1,
                support,
            },
        );
    }

    EvaluationReport {
        total: examples.len(),
        accuracy: if examples.is_empty() {
            0.0
        } else {
            correct as f64 / examples.len() as f64
        },
        per_category,
    }
}
