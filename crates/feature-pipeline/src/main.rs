//! ROI Feature Pipeline - Main Entry Point

use std::path::PathBuf;

use clap::Parser;
use feature_pipeline::{init_logging, run_pipeline, PipelineConfig};
use tracing::info;

/// Extract frequency-domain and first-order features from ROI volumes
#[derive(Debug, Parser)]
#[command(name = "roi-features", version)]
struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample manifest, overrides the configured one
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Output JSON-lines file, overrides the configured one
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Volumes processed at once
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(manifest) = args.manifest {
        config.manifest = Some(manifest);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(jobs) = args.jobs {
        config.max_concurrent_volumes = jobs;
    }
    config.validate()?;

    init_logging(config.log_json, &config.log_level)?;
    info!("=== ROI Feature Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let report = run_pipeline(&config)?;
    if !report.skipped.is_empty() {
        info!("{} samples skipped, see warnings above", report.skipped.len());
    }

    Ok(())
}
