//! Lint command implementation: analysis against existing stub trees.

use anyhow::{Context, Result};
use protogate_core::{Pipeline, PipelineError};
use std::path::Path;

use crate::OutputFormat;

/// Runs only the analysis stage for the project at `path`.
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

    tracing::info!("Analyzing targets under {}", base.display());

    match pipeline.lint() {
        Ok(results) => {
            super::output::print_results(&results, format)?;
            Ok(())
        }
        Err(PipelineError::Analysis { target, results }) => {
            super::output::print_results(&results, format)?;
            tracing::error!("Analysis failed at target `{target}`");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
