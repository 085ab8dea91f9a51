//! CLI command implementations.

pub mod generate;
pub mod init;
pub mod lint;
pub mod list_targets;
pub mod output;
pub mod run;

use anyhow::{Context, Result};
use protogate_core::Config;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["protogate.toml", ".protogate.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Loads the effective configuration for a project directory and returns
/// it with the absolute base path relative config entries resolve against.
///
/// Precedence: the `--config` flag (trusted as given; a missing file is a
/// load error), then `protogate.toml` / `.protogate.toml` in the project
/// directory, then `$PROTOGATE_CONFIG_DIR` or `~/.protogate/config.toml`,
/// then compiled-in defaults.
pub(crate) fn load_config(project: &Path, explicit: Option<&Path>) -> Result<(Config, PathBuf)> {
    let base = project
        .canonicalize()
        .with_context(|| format!("project path not found: {}", project.display()))?;

    let config = match find_config(&base, explicit, global_config_dir()) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => {
            tracing::debug!("No config file found; using defaults");
            Config::default()
        }
    };

    Ok((config, base))
}

/// Picks the config file to load, if any. `global_dir` is a parameter so
/// tests can run without touching the environment.
fn find_config(
    base: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = base.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return Some(candidate);
        }
    }

    let candidate = global_dir?.join(GLOBAL_CONFIG_NAME);
    if candidate.exists() {
        tracing::info!("Using global config: {}", candidate.display());
        return Some(candidate);
    }

    None
}

/// Global config directory: `$PROTOGATE_CONFIG_DIR` if set, else
/// `~/.protogate/`. The env var override serves CI images with no home
/// directory.
fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os("PROTOGATE_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|h| h.join(".protogate")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_flag_wins_over_project_file() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("protogate.toml"), "").unwrap();
        let custom = project.path().join("custom.toml");
        fs::write(&custom, "").unwrap();

        let found = find_config(project.path(), Some(&custom), None);
        assert_eq!(found, Some(custom));
    }

    #[test]
    fn explicit_flag_is_trusted_without_an_existence_check() {
        // The load step reports the missing file, not the lookup.
        let found = find_config(Path::new("/tmp"), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(found, Some(PathBuf::from("/nonexistent.toml")));
    }

    #[test]
    fn project_file_names_are_checked_in_order() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("protogate.toml"), "").unwrap();
        fs::write(project.path().join(".protogate.toml"), "").unwrap();

        let found = find_config(project.path(), None, None);
        assert_eq!(found, Some(project.path().join("protogate.toml")));
    }

    #[test]
    fn dot_prefixed_project_file_is_found() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".protogate.toml"), "").unwrap();

        let found = find_config(project.path(), None, None);
        assert_eq!(found, Some(project.path().join(".protogate.toml")));
    }

    #[test]
    fn global_config_is_a_fallback_only() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let found = find_config(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(found, Some(global.path().join("config.toml")));

        fs::write(project.path().join("protogate.toml"), "").unwrap();
        let found = find_config(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(found, Some(project.path().join("protogate.toml")));
    }

    #[test]
    fn global_dir_without_config_file_yields_none() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let found = find_config(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(found, None);
    }

    #[test]
    fn no_config_anywhere_yields_none() {
        let project = TempDir::new().unwrap();
        assert_eq!(find_config(project.path(), None, None), None);
    }

    #[test]
    fn load_config_reads_the_project_file() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("protogate.toml"),
            "schema_dir = \"schemas\"\n",
        )
        .unwrap();

        let (config, base) = load_config(project.path(), None).unwrap();
        assert_eq!(config.schema_dir, PathBuf::from("schemas"));
        assert_eq!(base, project.path().canonicalize().unwrap());
    }

    #[test]
    fn load_config_rejects_a_missing_project_dir() {
        assert!(load_config(Path::new("/nonexistent/project"), None).is_err());
    }
}
