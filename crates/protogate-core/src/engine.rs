//! The static-analysis engine interface and its command-backed adapter.
//!
//! The engine is an external, versioned tool consumed as a black box: it
//! accepts a rule-profile identifier, a target path, an exclusion list, an
//! auxiliary search path, and a disabled-check set, and returns pass/fail
//! plus diagnostics. [`CommandEngine`] follows the pylint convention;
//! tests substitute fakes implementing [`AnalysisEngine`].

use crate::registry::{LintTarget, Profile};
use crate::types::{Diagnostic, Location, RunResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from invoking the analysis engine.
///
/// A failing lint is not an error here: it comes back as a failing
/// [`RunResult`]. These variants cover the engine itself misbehaving.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine executable could not be started.
    #[error("analysis engine `{program}` could not be started: {source}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The engine exited nonzero without reporting any diagnostics:
    /// a crash, not a lint failure.
    #[error("analysis engine crashed on target `{target}` ({status}):\n{stderr}")]
    Crashed {
        /// Target being analyzed when the engine crashed.
        target: String,
        /// Exit status description.
        status: String,
        /// Captured engine stderr.
        stderr: String,
    },

    /// The search-path entries could not be joined into one env value.
    #[error("invalid symbol search path: {0}")]
    SearchPath(#[from] std::env::JoinPathsError),

    /// Invalid diagnostic-matching pattern.
    #[error("invalid diagnostic pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// External static-analysis engine, consumed as a black box.
pub trait AnalysisEngine {
    /// Analyzes one lint target and returns its pass/fail result with
    /// diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] only when the engine itself misbehaves;
    /// findings come back as a failing [`RunResult`].
    fn analyze(&self, target: &LintTarget) -> Result<RunResult, EngineError>;
}

/// Paths to the per-profile engine rcfiles.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    /// Strict rcfile for `main` targets.
    pub main: PathBuf,
    /// Relaxed rcfile for `test` targets.
    pub test: PathBuf,
}

impl ProfileSet {
    /// Returns the rcfile path for `profile`.
    #[must_use]
    pub fn rcfile(&self, profile: Profile) -> &Path {
        match profile {
            Profile::Main => &self.main,
            Profile::Test => &self.test,
        }
    }
}

/// Command-backed engine following the pylint convention.
///
/// For each target the engine runs `<program> <args..> --rcfile=<profile rc>
/// [--ignore=..] [--disable=..] .` with the target root as working
/// directory, and the symbol search path exported through an environment
/// variable (default `PYTHONPATH`): the target's own root first, then its
/// auxiliary roots in order.
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    profiles: ProfileSet,
    search_path_var: String,
}

impl CommandEngine {
    /// Creates an engine invoking `program` with leading `args` and the
    /// given profile rcfiles.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, profiles: ProfileSet) -> Self {
        Self {
            program: program.into(),
            args,
            profiles,
            search_path_var: "PYTHONPATH".to_string(),
        }
    }

    /// Overrides the environment variable carrying the symbol search path.
    #[must_use]
    pub fn with_search_path_var(mut self, var: impl Into<String>) -> Self {
        self.search_path_var = var.into();
        self
    }
}

impl AnalysisEngine for CommandEngine {
    fn analyze(&self, target: &LintTarget) -> Result<RunResult, EngineError> {
        let rcfile = self.profiles.rcfile(target.profile);
        let search_path = std::env::join_paths(target.search_path())?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(format!("--rcfile={}", rcfile.display()));
        let ignores = ignore_basenames(&target.exclude);
        if !ignores.is_empty() {
            cmd.arg(format!("--ignore={}", ignores.join(",")));
        }
        if !target.disabled_checks.is_empty() {
            cmd.arg(format!("--disable={}", target.disabled_checks.join(",")));
        }
        cmd.arg(".")
            .current_dir(&target.root)
            .env(&self.search_path_var, &search_path);

        info!(
            "Running analysis engine for `{}`: {:?} (cwd: {}, {}={:?})",
            target.name,
            cmd,
            target.root.display(),
            self.search_path_var,
            search_path
        );

        let output = cmd.output().map_err(|e| EngineError::Launch {
            program: self.program.clone(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let diagnostics = parse_diagnostics(&stdout)?;

        if output.status.success() {
            debug!("Target `{}` passed", target.name);
            return Ok(RunResult::pass(&target.name));
        }

        if diagnostics.is_empty() {
            return Err(EngineError::Crashed {
                target: target.name.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(RunResult::fail(&target.name, diagnostics))
    }
}

/// Maps exclusion patterns to the file/directory basenames the engine's
/// `--ignore` flag understands: `compiled_proto/*` excludes the
/// `compiled_proto` directory. Patterns with no literal leading component
/// contribute nothing here; the orchestrator's post-filter still applies
/// the full glob to every reported diagnostic.
fn ignore_basenames(patterns: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for pattern in patterns {
        let literal = pattern
            .split('/')
            .take_while(|c| !c.contains(['*', '?', '[']))
            .last();
        if let Some(name) = literal {
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Parses engine output lines of the form `file:line:col: CHECK: message`.
///
/// Lines in any other shape (headers, summaries, separators) are skipped.
fn parse_diagnostics(stdout: &str) -> Result<Vec<Diagnostic>, EngineError> {
    let pattern = Regex::new(r"^(?P<file>[^:\s][^:]*):(?P<line>\d+):(?P<col>\d+): (?P<check>[A-Za-z][A-Za-z0-9-]*\d*): (?P<message>.+)$")?;

    let mut diagnostics = Vec::new();
    for line in stdout.lines() {
        if let Some(caps) = pattern.captures(line) {
            let line_no = caps["line"].parse().unwrap_or(0);
            let col = caps["col"].parse().unwrap_or(0);
            diagnostics.push(Diagnostic::new(
                &caps["check"],
                &caps["message"],
                Location::new(caps["file"].to_string(), line_no, col),
            ));
        }
    }
    Ok(diagnostics)
}
