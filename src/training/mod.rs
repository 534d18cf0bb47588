/// Training pipeline glue
///
/// Offline tooling around the classifier: dataset loading and auditing,
/// TF-IDF + logistic-regression training, artifact/metadata writing, and
/// evaluation of a trained artifact against a labelled set. The serving
/// path never calls into this module.

pub mod dataset;
pub mod trainer;

pub use dataset::{audit, load_jsonl, DatasetReport, TrainingExample};
pub use trainer::{evaluate, train, EvaluationReport, TrainOptions};
