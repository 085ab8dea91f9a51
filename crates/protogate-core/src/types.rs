//! Core types for engine diagnostics and per-target run results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source location of a reported diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as reported by the engine, relative to the target root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number, as reported by the engine.
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A single finding reported by the static-analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Check identifier (e.g., "C0114").
    pub check: String,
    /// Human-readable message.
    pub message: String,
    /// Where the finding was reported.
    pub location: Location,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(check: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            location,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.check,
            self.message
        )
    }
}

/// Converts a [`Diagnostic`] to a miette diagnostic for rich error display.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct CheckDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
}

impl From<&Diagnostic> for CheckDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {}", d.check, d.message),
            help: Some(format!(
                "reported at {}:{}:{}",
                d.location.file.display(),
                d.location.line,
                d.location.column
            )),
        }
    }
}

/// Result of one analysis-engine invocation for one lint target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Name of the lint target that was analyzed.
    pub target: String,
    /// Whether the engine reported a clean pass.
    pub passed: bool,
    /// Findings reported for this target.
    pub diagnostics: Vec<Diagnostic>,
}

impl RunResult {
    /// Creates a passing result with no findings.
    #[must_use]
    pub fn pass(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            passed: true,
            diagnostics: Vec::new(),
        }
    }

    /// Creates a failing result carrying the engine's findings.
    #[must_use]
    pub fn fail(target: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            target: target.into(),
            passed: false,
            diagnostics,
        }
    }

}

/// Ordered, short-circuited output of one orchestrator run.
///
/// Results appear in registry order and stop at the first failing target;
/// targets after the first failure are never invoked.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Per-target results, in invocation order.
    pub results: Vec<RunResult>,
}

impl RunOutcome {
    /// Returns true if every invoked target passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Returns the first failing result, if any.
    ///
    /// With fail-fast orchestration this is always the last element when
    /// present.
    #[must_use]
    pub fn first_failure(&self) -> Option<&RunResult> {
        self.results.iter().find(|r| !r.passed)
    }
}
