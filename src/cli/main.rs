use anyhow::Context;
use clap::{Parser, Subcommand};
use incident_classifier::inference::TfidfModel;
use incident_classifier::training::{self, TrainOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "incident-trainer")]
#[command(about = "Training and dataset tooling for the incident classifier", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a classifier and write the artifact plus metadata sidecar
    Train {
        /// Labelled JSONL dataset ({"text", "category"} per line)
        #[arg(short, long)]
        dataset: PathBuf,

        /// Output path for the model artifact
        #[arg(short, long, default_value = "data/model/artifact.json")]
        output: PathBuf,

        /// Output path for the metadata sidecar
        #[arg(short, long, default_value = "data/model/metadata.json")]
        metadata: PathBuf,

        /// Version tag for the trained artifact
        #[arg(short, long)]
        version: Option<String>,

        /// Maximum vocabulary size
        #[arg(long, default_value = "2000")]
        max_vocab: usize,

        /// Minimum document frequency for vocabulary terms
        #[arg(long, default_value = "2")]
        min_doc_freq: usize,
    },

    /// Audit a dataset: per-category counts, empty and duplicate rows
    Validate {
        #[arg(short, long)]
        dataset: PathBuf,
    },

    /// Evaluate a trained artifact against a labelled dataset
    Evaluate {
        #[arg(short, long)]
        dataset: PathBuf,

        #[arg(short, long, default_value = "data/model/artifact.json")]
        model: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incident_classifier=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            dataset,
            output,
            metadata,
            version,
            max_vocab,
            min_doc_freq,
        } => {
            let examples = training::load_jsonl(&dataset)
                .with_context(|| format!("loading dataset {}", dataset.display()))?;

            let report = training::audit(&examples);
            for warning in &report.warnings {
                tracing::warn!("{}", warning);
            }

            let mut options = TrainOptions {
                max_vocab_size: max_vocab,
                min_doc_freq,
                ..TrainOptions::default()
            };
            if let Some(version) = version {
                options.version = version;
            }

            tracing::info!(
                examples = examples.len(),
                version = %options.version,
                "Training classifier"
            );
            let (artifact, sidecar) = training::train(&examples, &options)?;

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, serde_json::to_string_pretty(&artifact)?)?;
            if let Some(parent) = metadata.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&metadata, serde_json::to_string_pretty(&sidecar)?)?;

            tracing::info!(
                artifact = %output.display(),
                accuracy = format!("{:.2}%", sidecar.accuracy * 100.0),
                "✅ Training completed"
            );
        }

        Commands::Validate { dataset } => {
            let examples = training::load_jsonl(&dataset)
                .with_context(|| format!("loading dataset {}", dataset.display()))?;
            let report = training::audit(&examples);

            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.warnings.is_empty() {
                anyhow::bail!("dataset audit produced {} warnings", report.warnings.len());
            }
        }

        Commands::Evaluate { dataset, model } => {
            let examples = training::load_jsonl(&dataset)
                .with_context(|| format!("loading dataset {}", dataset.display()))?;
            let model = TfidfModel::load(&model)
                .map_err(|e| anyhow::anyhow!("loading model artifact: {}", e))?;

            let report = training::evaluate(&model, &examples);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
