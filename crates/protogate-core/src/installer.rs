//! Dependency installation, invoked once before generation.

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the dependency-installation stage.
#[derive(Debug, Error)]
pub enum InstallError {
    /// A configured requirements manifest does not exist.
    #[error("requirements manifest not found: {0}")]
    MissingManifest(PathBuf),

    /// The installer executable could not be started.
    #[error("installer `{program}` could not be started: {source}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The installer ran but reported failure.
    #[error("dependency installation failed ({status}):\n{stderr}")]
    Failed {
        /// Exit status description.
        status: String,
        /// Captured installer stderr.
        stderr: String,
    },
}

/// External dependency installer, consumed as a black box.
pub trait DependencyInstaller {
    /// Installs the declared dependencies.
    ///
    /// Returns `true` if an installation actually ran, `false` for a
    /// recorded no-op (nothing declared).
    ///
    /// # Errors
    ///
    /// Any installation failure is fatal to the pipeline.
    fn install(&self) -> Result<bool, InstallError>;
}

/// Command-backed installer following the pip convention:
/// `<program> <args..> -r <manifest>` per requirements manifest.
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
    requirements: Vec<PathBuf>,
}

impl CommandInstaller {
    /// Creates an installer invoking `program` with leading `args` for the
    /// given requirements manifests.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, requirements: Vec<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            requirements,
        }
    }
}

impl DependencyInstaller for CommandInstaller {
    fn install(&self) -> Result<bool, InstallError> {
        if self.requirements.is_empty() {
            debug!("No requirements manifests configured; skipping install");
            return Ok(false);
        }

        for manifest in &self.requirements {
            if !manifest.exists() {
                return Err(InstallError::MissingManifest(manifest.clone()));
            }
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for manifest in &self.requirements {
            cmd.arg("-r").arg(manifest);
        }

        info!("Installing dependencies: {:?}", cmd);

        let output = cmd.output().map_err(|e| InstallError::Launch {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(InstallError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_manifests_is_a_recorded_noop() {
        let installer = CommandInstaller::new("pip", vec![], vec![]);
        assert!(!installer.install().unwrap());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let installer = CommandInstaller::new(
            "pip",
            vec![],
            vec![PathBuf::from("/nonexistent/requirements.txt")],
        );
        let err = installer.install().unwrap_err();
        assert!(matches!(err, InstallError::MissingManifest(_)));
    }
}
