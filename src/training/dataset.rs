use crate::error::{AppError, Result};
use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One labelled training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub category: Category,
}

/// Load a JSONL dataset (`{"text": ..., "category": ...}` per line).
///
/// Blank lines are skipped; a malformed line is an error with its line
/// number, since silently dropping labelled data skews training.
pub fn load_jsonl(path: &Path) -> Result<Vec<TrainingExample>> {
    let raw = std::fs::read_to_string(path)?;
    let mut examples = Vec::new();

    for (lineno, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let example: TrainingExample = serde_json::from_str(line).map_err(|e| {
            AppError::Validation(format!("dataset line {}: {}", lineno + 1, e))
        })?;
        examples.push(example);
    }

    Ok(examples)
}

/// Dataset audit results.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub total: usize,
    pub per_category: HashMap<String, usize>,
    pub empty_texts: usize,
    pub duplicate_texts: usize,
    pub warnings: Vec<String>,
}

/// Minimum examples per category before training is considered useful.
const MIN_PER_CATEGORY: usize = 20;

/// Audit a dataset: per-category counts, empty and duplicate rows,
/// under-represented categories.
pub fn audit(examples: &[TrainingExample]) -> DatasetReport {
    let mut per_category: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut empty_texts = 0;
    let mut duplicate_texts = 0;

    for example in examples {
        *per_category
            .entry(example.category.to_string())
            .or_insert(0) += 1;

        let normalized = example.text.trim().to_lowercase();
        if normalized.is_empty() {
            empty_texts += 1;
        } else if !seen.insert(normalized) {
            duplicate_texts += 1;
        }
    }

    let mut warnings = Vec::new();
    if examples.is_empty() {
        warnings.push("dataset is empty".to_string());
    }
    if empty_texts > 0 {
        warnings.push(format!("{} examples have empty text", empty_texts));
    }
    if duplicate_texts > 0 {
        warnings.push(format!("{} duplicate texts", duplicate_texts));
    }
    for (category, count) in &per_category {
        if *count < MIN_PER_CATEGORY {
            warnings.push(format!(
                "category {} has only {} examples (want at least {})",
                category, count, MIN_PER_CATEGORY
            ));
        }
    }

    DatasetReport {
        total: examples.len(),
        per_category,
        empty_texts,
        duplicate_texts,
        warnings,
    }
}

/// Rough language split used for per-language metrics: a text counts as
/// Amharic when it contains any Ethiopic-block character.
pub fn is_amharic(text: &str) -> bool {
    text.chars().any(|c| ('\u{1200}'..='\u{137F}').contains(&c))
}
