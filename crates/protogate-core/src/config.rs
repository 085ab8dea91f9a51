//! Configuration types for protogate.
//!
//! The fixed pipeline layout is configuration, not code: the schema
//! directory, the two destination trees, and the ordered lint target
//! table all come from one TOML file. Relative paths are resolved against
//! the project base directory at assembly time.

use crate::engine::{CommandEngine, ProfileSet};
use crate::generator::CommandCompiler;
use crate::installer::CommandInstaller;
use crate::registry::{LintTarget, Profile, Registry, RegistryError};
use crate::schema::StubTree;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for protogate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the shared schema units.
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Schema compiler invocation.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Analysis engine invocation.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Dependency installer invocation.
    #[serde(default)]
    pub installer: InstallerConfig,

    /// Per-profile engine rcfiles.
    #[serde(default)]
    pub profiles: ProfileConfig,

    /// Destination stub trees, one per consumer package.
    #[serde(default)]
    pub trees: Vec<TreeConfig>,

    /// Ordered lint target table.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            compiler: CompilerConfig::default(),
            engine: EngineConfig::default(),
            installer: InstallerConfig::default(),
            profiles: ProfileConfig::default(),
            trees: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Returns the schema directory resolved against `base`.
    #[must_use]
    pub fn schema_dir_in(&self, base: &Path) -> PathBuf {
        resolve(base, &self.schema_dir)
    }

    /// Builds the destination stub trees, paths resolved against `base`.
    #[must_use]
    pub fn stub_trees(&self, base: &Path) -> Vec<StubTree> {
        self.trees
            .iter()
            .map(|t| StubTree::new(resolve(base, &t.dest), t.package.clone()))
            .collect()
    }

    /// Builds the lint target registry, roots resolved against `base`.
    /// Auxiliary paths stay as declared: they are interpreted relative to
    /// each target's root at analysis time.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] for an empty table or duplicate names.
    pub fn registry(&self, base: &Path) -> Result<Registry, RegistryError> {
        let targets = self
            .targets
            .iter()
            .map(|t| {
                LintTarget::new(t.name.clone(), resolve(base, &t.root), t.profile)
                    .with_exclude(t.exclude.clone())
                    .with_aux_paths(t.aux_paths.clone())
                    .with_disabled_checks(t.disabled_checks.clone())
            })
            .collect();
        Registry::new(targets)
    }

    /// Builds the command-backed schema compiler.
    #[must_use]
    pub fn command_compiler(&self) -> CommandCompiler {
        CommandCompiler::new(self.compiler.program.clone(), self.compiler.args.clone())
    }

    /// Builds the command-backed analysis engine, rcfiles resolved
    /// against `base` (the engine changes into each target root, so
    /// rcfile paths must not stay project-relative).
    #[must_use]
    pub fn command_engine(&self, base: &Path) -> CommandEngine {
        let profiles = ProfileSet {
            main: resolve(base, &self.profiles.main),
            test: resolve(base, &self.profiles.test),
        };
        CommandEngine::new(self.engine.program.clone(), self.engine.args.clone(), profiles)
            .with_search_path_var(self.engine.search_path_var.clone())
    }

    /// Builds the command-backed installer, manifests resolved against
    /// `base`.
    #[must_use]
    pub fn command_installer(&self, base: &Path) -> CommandInstaller {
        let requirements = self
            .installer
            .requirements
            .iter()
            .map(|r| resolve(base, r))
            .collect();
        CommandInstaller::new(
            self.installer.program.clone(),
            self.installer.args.clone(),
            requirements,
        )
    }
}

/// Schema compiler invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Program to run.
    #[serde(default = "default_python")]
    pub program: String,
    /// Leading arguments before the adapter-provided flags.
    #[serde(default = "default_compiler_args")]
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_python(),
            args: default_compiler_args(),
        }
    }
}

/// Analysis engine invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Program to run.
    #[serde(default = "default_python")]
    pub program: String,
    /// Leading arguments before the adapter-provided flags.
    #[serde(default = "default_engine_args")]
    pub args: Vec<String>,
    /// Environment variable carrying the symbol search path.
    #[serde(default = "default_search_path_var")]
    pub search_path_var: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_python(),
            args: default_engine_args(),
            search_path_var: default_search_path_var(),
        }
    }
}

/// Dependency installer invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Program to run.
    #[serde(default = "default_python")]
    pub program: String,
    /// Leading arguments before the per-manifest flags.
    #[serde(default = "default_installer_args")]
    pub args: Vec<String>,
    /// Requirements manifests to install. Empty list: install stage is a
    /// recorded no-op.
    #[serde(default)]
    pub requirements: Vec<PathBuf>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: default_python(),
            args: default_installer_args(),
            requirements: Vec::new(),
        }
    }
}

/// Per-profile engine rcfiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Strict rcfile for `main` targets.
    #[serde(default = "default_main_rcfile")]
    pub main: PathBuf,
    /// Relaxed rcfile for `test` targets.
    #[serde(default = "default_test_rcfile")]
    pub test: PathBuf,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            main: default_main_rcfile(),
            test: default_test_rcfile(),
        }
    }
}

/// One destination stub tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Destination directory.
    pub dest: PathBuf,
    /// Dotted package path of the installed tree.
    pub package: String,
}

/// One lint target row of the registry table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Unique target name.
    pub name: String,
    /// Target root directory.
    pub root: PathBuf,
    /// Rule profile.
    pub profile: Profile,
    /// Excluded sub-path patterns.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Auxiliary search-path roots, relative to the target root.
    #[serde(default)]
    pub aux_paths: Vec<PathBuf>,
    /// Disabled check identifiers.
    #[serde(default)]
    pub disabled_checks: Vec<String>,
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("proto/src")
}

fn default_python() -> String {
    "python".to_string()
}

fn default_compiler_args() -> Vec<String> {
    vec!["-m".to_string(), "grpc_tools.protoc".to_string()]
}

fn default_engine_args() -> Vec<String> {
    vec!["-m".to_string(), "pylint".to_string()]
}

fn default_installer_args() -> Vec<String> {
    vec!["-m".to_string(), "pip".to_string(), "install".to_string()]
}

fn default_search_path_var() -> String {
    "PYTHONPATH".to_string()
}

fn default_main_rcfile() -> PathBuf {
    PathBuf::from("ci/lint_main.rc")
}

fn default_test_rcfile() -> PathBuf {
    PathBuf::from("ci/lint_test.rc")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_layout() {
        let config = Config::default();
        assert_eq!(config.schema_dir, PathBuf::from("proto/src"));
        assert!(config.trees.is_empty());
        assert!(config.targets.is_empty());
        assert_eq!(config.engine.search_path_var, "PYTHONPATH");
    }

    #[test]
    fn parse_full_layout() {
        let toml = r#"
schema_dir = "proto/src"

[profiles]
main = "ci/lint_main.rc"
test = "ci/lint_test.rc"

[[trees]]
dest = "pycore/pycore/compiled_proto"
package = "pycore.compiled_proto"

[[trees]]
dest = "agent/agent/compiled_proto"
package = "agent.compiled_proto"

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
aux_paths = ["../pycore"]
disabled_checks = ["no-member"]
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.trees.len(), 2);
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.targets[2].disabled_checks, ["no-member"]);

        let base = Path::new("/repo");
        let trees = config.stub_trees(base);
        assert_eq!(
            trees[0].dest,
            PathBuf::from("/repo/pycore/pycore/compiled_proto")
        );
        assert_eq!(trees[0].package, "pycore.compiled_proto");

        let registry = config.registry(base).expect("Failed to build registry");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.targets()[0].exclude, ["compiled_proto/*"]);
        assert_eq!(
            registry.targets()[2].aux_paths,
            [PathBuf::from("../pycore")]
        );
    }

    #[test]
    fn parse_rejects_unknown_profile() {
        let toml = r#"
[[targets]]
name = "pkg"
root = "pkg"
profile = "strictest"
"#;
        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn registry_from_empty_table_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.registry(Path::new("/repo")),
            Err(RegistryError::Empty)
        ));
    }
}
