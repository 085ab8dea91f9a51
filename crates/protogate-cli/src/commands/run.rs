//! Run command implementation: the full pipeline.

use anyhow::{Context, Result};
use protogate_core::{Pipeline, PipelineError};
use std::path::Path;

use crate::OutputFormat;

/// Runs the full pipeline for the project at `path`.
pub fn run(path: &Path, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let (config, base) = super::load_config(path, config_path)?;

    let compiler = config.command_compiler();
    let engine = config.command_engine(&base);
    let installer = config.command_installer(&base);
    let registry = config
        .registry(&base)
        .context("invalid lint target registry")?;

    let pipeline = Pipeline::new(
        &compiler,
        &engine,
        &installer,
        config.schema_dir_in(&base),
        config.stub_trees(&base),
        registry,
    );

    tracing::info!("Running pipeline for {}", base.display());

    match pipeline.run() {
        Ok(report) => {
            super::output::print_report(&report, format)?;
            Ok(())
        }
        Err(PipelineError::Analysis { target, results }) => {
            super::output::print_results(&results, format)?;
            tracing::error!("Pipeline failed at analysis of target `{target}`");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
