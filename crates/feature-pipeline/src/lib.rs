//! ROI Feature Pipeline
//!
//! Loads (volume, mask) pairs listed in a manifest, runs every configured
//! extractor on each pair and writes one feature record per sample.
//! Failures are per sample: the sample is logged and skipped, the batch goes on.

pub mod config;
pub mod manifest;
pub mod record;
pub mod runner;

pub use config::PipelineConfig;
pub use manifest::{load_manifest, SampleDescriptor};
pub use record::{FeatureRecord, RecordWriter};
pub use runner::{BatchReport, BatchRunner, SkippedSample};

use std::path::PathBuf;

use feature_engine::FeatureError;
use roi_volume::VolumeError;
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Missing mask: {}", .0.display())]
    MissingMask(PathBuf),

    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),

    #[error("{extractor} extraction failed: {source}")]
    Feature {
        extractor: &'static str,
        #[source]
        source: FeatureError,
    },

    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for PipelineError {
    fn from(err: ::config::ConfigError) -> Self {
        PipelineError::Config(err.to_string())
    }
}

/// Initialize logging
///
/// `level` is a `tracing` level name; unknown names fall back to INFO.
pub fn init_logging(json: bool, level: &str) -> Result<(), PipelineError> {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| PipelineError::Logging(e.to_string()))
}

/// Run the whole pipeline described by `config`
///
/// Reads the manifest, extracts every sample and writes the records. Skipped
/// samples are reported, not treated as failures.
pub fn run_pipeline(config: &PipelineConfig) -> Result<BatchReport, PipelineError> {
    let manifest_path = config.manifest.as_ref().ok_or_else(|| {
        PipelineError::Config("no manifest configured (set `manifest` or pass --manifest)".into())
    })?;

    let samples = load_manifest(manifest_path)?;
    info!("Loaded {} samples from {}", samples.len(), manifest_path.display());

    let runner = BatchRunner::from_config(config)?;
    let report = runner.run(&samples)?;

    let mut writer = RecordWriter::create(&config.output)?;
    for record in &report.records {
        writer.write(record)?;
    }
    writer.finish()?;

    info!(
        "Extracted {} ROIs -> {} ({} skipped)",
        report.records.len(),
        config.output.display(),
        report.skipped.len()
    );
    Ok(report)
}
