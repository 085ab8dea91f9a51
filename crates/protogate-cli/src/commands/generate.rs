//! Generate command implementation: stub preparation without linting.

use anyhow::{Context, Result};
use protogate_core::Pipeline;
use std::path::Path;

/// Generates and rewrites the stub trees for the project at `path`.
pub fn run(path: &Path, config_path: Option<&Path>) -> Result<()> {
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

    let report = pipeline.prepare()?;
    super::output::print_prepare_summary(&report);
    Ok(())
}
