//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# protogate configuration
# Shared-schema stub generation and lint pipeline

# Directory holding the shared .proto schema units
schema_dir = "proto/src"

# Per-profile engine rcfiles: "main" is strict, "test" is relaxed
[profiles]
main = "ci/lint_main.rc"
test = "ci/lint_test.rc"

# External tool invocations (defaults shown)
# [compiler]
# program = "python"
# args = ["-m", "grpc_tools.protoc"]
#
# [engine]
# program = "python"
# args = ["-m", "pylint"]
# search_path_var = "PYTHONPATH"
#
# [installer]
# program = "python"
# args = ["-m", "pip", "install"]
# requirements = ["requirements.txt"]

# Destination stub trees, one per consumer package.
# Each tree is regenerated from scratch on every run.

[[trees]]
dest = "pycore/pycore/compiled_proto"
package = "pycore.compiled_proto"

[[trees]]
dest = "agent/agent/compiled_proto"
package = "agent.compiled_proto"

# Ordered lint target registry. Targets run top to bottom and the first
# failure stops the run.

[[targets]]
name = "pycore"
root = "pycore"
profile = "main"
exclude = ["compiled_proto/*"]

[[targets]]
name = "pycore-tests"
root = "pycore"
profile = "test"

[[targets]]
name = "outline"
root = "outline"
profile = "main"
# Resolve pycore symbols without installing the package
aux_paths = ["../pycore"]
disabled_checks = ["no-member"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("protogate.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created protogate.toml");
    println!("\nNext steps:");
    println!("  1. Edit protogate.toml to match your repository layout");
    println!("  2. Run: protogate run");

    Ok(())
}
