//! List-targets command implementation.

use anyhow::{Context, Result};
use std::path::Path;

/// Prints the configured lint target registry in order.
pub fn run(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let (config, base) = super::load_config(path, config_path)?;
    let registry = config
        .registry(&base)
        .context("invalid lint target registry")?;

    println!("Configured lint targets (in run order):\n");
    println!(
        "{:<4} {:<20} {:<8} {:<30} Aux paths / disabled checks",
        "#", "Name", "Profile", "Root"
    );
    println!("{}", "-".repeat(100));

    for (idx, target) in registry.targets().iter().enumerate() {
        let mut extras = Vec::new();
        if !target.aux_paths.is_empty() {
            let paths: Vec<String> = target
                .aux_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            extras.push(format!("aux=[{}]", paths.join(", ")));
        }
        if !target.exclude.is_empty() {
            extras.push(format!("exclude=[{}]", target.exclude.join(", ")));
        }
        if !target.disabled_checks.is_empty() {
            extras.push(format!("disable=[{}]", target.disabled_checks.join(", ")));
        }

        println!(
            "{:<4} {:<20} {:<8} {:<30} {}",
            idx + 1,
            target.name,
            target.profile.as_str(),
            target.root.display(),
            extras.join(" ")
        );
    }

    Ok(())
}
