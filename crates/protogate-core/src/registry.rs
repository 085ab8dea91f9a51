//! The fixed, ordered table of lint targets.
//!
//! Per-package differences (profile, exclusions, auxiliary search paths,
//! disabled checks) live in [`LintTarget`] records consumed by one generic
//! orchestration loop, rather than per-package procedural blocks. Order is
//! part of the contract: it gives reproducible, diffable output, and
//! targets whose auxiliary paths reference a sibling's sources run after
//! generation has produced every tree.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rule-profile variant controlling engine strictness.
///
/// `Main` is the strict profile for authored package code; `Test` relaxes
/// checks for patterns test code is allowed to use (mock-heavy idioms and
/// the like).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Strict profile for package source code.
    Main,
    /// Relaxed profile for test code.
    Test,
}

impl Profile {
    /// Returns the lowercase profile identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statically configured analysis target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintTarget {
    /// Unique target name, used in reports.
    pub name: String,
    /// Root path the engine runs in and analyzes.
    pub root: PathBuf,
    /// Rule profile applied to this target.
    pub profile: Profile,
    /// Sub-path patterns excluded from analysis (generated or vendored
    /// code that is not held to authored-code style rules).
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Ordered auxiliary search-path roots, for resolving symbols defined
    /// in sibling packages without installing them.
    #[serde(default)]
    pub aux_paths: Vec<PathBuf>,
    /// Check identifiers disabled for this target.
    #[serde(default)]
    pub disabled_checks: Vec<String>,
}

impl LintTarget {
    /// Creates a target with no exclusions, auxiliary paths, or disabled
    /// checks.
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, profile: Profile) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            profile,
            exclude: Vec::new(),
            aux_paths: Vec::new(),
            disabled_checks: Vec::new(),
        }
    }

    /// Sets the exclusion patterns.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the auxiliary search-path roots.
    #[must_use]
    pub fn with_aux_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.aux_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the disabled check identifiers.
    #[must_use]
    pub fn with_disabled_checks<I, S>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_checks = checks.into_iter().map(Into::into).collect();
        self
    }

    /// Symbol search path for this target: the target's own root first,
    /// then the auxiliary roots in declaration order.
    #[must_use]
    pub fn search_path(&self) -> Vec<PathBuf> {
        std::iter::once(self.root.clone())
            .chain(self.aux_paths.iter().cloned())
            .collect()
    }

    /// Checks whether a reported path falls under one of this target's
    /// exclusion patterns.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "compiled/*"
            let normalized_pattern = pattern.replace('*', "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}

/// Registry construction errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two targets share a name; reports would be ambiguous.
    #[error("duplicate lint target name `{0}`")]
    DuplicateName(String),

    /// The registry holds no targets; the pipeline has nothing to check.
    #[error("lint target registry is empty")]
    Empty,
}

/// The ordered collection of lint targets for one pipeline run.
#[derive(Debug, Clone)]
pub struct Registry {
    targets: Vec<LintTarget>,
}

impl Registry {
    /// Builds a registry from an ordered target list.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Empty`] for an empty list and
    /// [`RegistryError::DuplicateName`] when two targets share a name.
    pub fn new(targets: Vec<LintTarget>) -> Result<Self, RegistryError> {
        if targets.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for target in &targets {
            if !seen.insert(target.name.as_str()) {
                return Err(RegistryError::DuplicateName(target.name.clone()));
            }
        }
        Ok(Self { targets })
    }

    /// Returns the targets in registry order.
    #[must_use]
    pub fn targets(&self) -> &[LintTarget] {
        &self.targets
    }

    /// Returns the number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if the registry has no targets. Always false for a
    /// constructed registry; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
