//! Import rewriting for generated stub trees.
//!
//! The schema compiler emits flat same-level imports (`import job_pb2 as
//! job__pb2`) that assume its outputs sit at a search-path root. Consumers
//! nest each tree under a sub-package, so every such reference must become
//! `from <package> import job_pb2 as job__pb2` before the tree resolves
//! from its installed location.
//!
//! The pass is purely textual, idempotent (a second application is a
//! byte-identical no-op), and total: an import form it does not recognize
//! or a reference that does not resolve inside the tree is an error, never
//! a silent skip. Package-qualified imports of foreign stubs (well-known
//! types and the like) are left untouched.

use crate::schema::StubTree;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Errors from the import-rewriting pass. All are fatal to the pipeline:
/// an inconsistently rewritten tree is worse than no tree.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// IO error reading or writing a stub file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the stub tree.
    #[error("failed to walk stub tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid import-matching pattern.
    #[error("invalid import pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A rewritten or already-scoped reference does not resolve to a file
    /// inside the tree.
    #[error("{file}: import of `{module}` does not resolve inside the stub tree")]
    DanglingReference {
        /// Stub file holding the reference.
        file: PathBuf,
        /// Referenced module name.
        module: String,
    },

    /// A flat stub import in a form the rewriter does not understand.
    /// Signals a compiler-output contract change, surfaced rather than
    /// skipped.
    #[error("{file}:{line}: unrecognized import form `{text}`")]
    UnrecognizedImport {
        /// Stub file holding the import.
        file: PathBuf,
        /// Line number (1-indexed).
        line: usize,
        /// Offending line text.
        text: String,
    },
}

/// Per-tree rewrite statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RewriteStats {
    /// Stub files examined.
    pub files_scanned: usize,
    /// Files whose content changed.
    pub files_changed: usize,
    /// Flat imports rewritten into package-scoped form.
    pub imports_rewritten: usize,
}

/// Module name shape of a generated stub: `<unit>_pb2` or `<unit>_pb2_grpc`.
const STUB_MODULE: &str = r"[A-Za-z0-9_]+_pb2(?:_grpc)?";

/// Rewrites every flat stub import in `tree` to its package-scoped form.
///
/// Files are only written when their content changed, so re-running on an
/// already-rewritten tree leaves every file byte-identical. Files outside
/// `tree.dest` are never touched.
///
/// # Errors
///
/// Returns a [`RewriteError`] on IO failure, on an unrecognized flat
/// import form, or on a reference that does not resolve inside the tree.
pub fn rewrite_tree(tree: &StubTree) -> Result<RewriteStats, RewriteError> {
    let flat = Regex::new(&format!(
        r"^import ({STUB_MODULE})((?: as [A-Za-z0-9_.]+)?)\s*$"
    ))?;
    let scoped = Regex::new(&format!(
        r"^from {} import ({STUB_MODULE})(?: as [A-Za-z0-9_.]+)?\s*$",
        regex::escape(&tree.package)
    ))?;

    let files = stub_files(tree)?;
    let modules: BTreeSet<String> = files
        .iter()
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()))
        .map(String::from)
        .collect();

    let mut stats = RewriteStats::default();

    for path in &files {
        stats.files_scanned += 1;
        let content = std::fs::read_to_string(path)?;
        let mut out = String::with_capacity(content.len());
        let mut changed = false;

        for (idx, raw) in content.split_inclusive('\n').enumerate() {
            let (line, terminator) = if let Some(stripped) = raw.strip_suffix("\r\n") {
                (stripped, "\r\n")
            } else if let Some(stripped) = raw.strip_suffix('\n') {
                (stripped, "\n")
            } else {
                (raw, "")
            };

            if let Some(caps) = flat.captures(line) {
                let module = &caps[1];
                if !modules.contains(module) {
                    return Err(RewriteError::DanglingReference {
                        file: path.clone(),
                        module: module.to_string(),
                    });
                }
                out.push_str(&format!(
                    "from {} import {}{}{}",
                    tree.package, module, &caps[2], terminator
                ));
                stats.imports_rewritten += 1;
                changed = true;
                continue;
            }

            if let Some(caps) = scoped.captures(line) {
                // Already rewritten on a previous run; keep, but the
                // reference must still resolve in-tree.
                let module = &caps[1];
                if !modules.contains(module) {
                    return Err(RewriteError::DanglingReference {
                        file: path.clone(),
                        module: module.to_string(),
                    });
                }
            } else if line.trim_start().starts_with("import ") && line.contains("_pb2") {
                // A flat stub import we cannot map: compiler contract change.
                return Err(RewriteError::UnrecognizedImport {
                    file: path.clone(),
                    line: idx + 1,
                    text: line.to_string(),
                });
            }

            out.push_str(raw);
        }

        if changed {
            std::fs::write(path, &out)?;
            stats.files_changed += 1;
            debug!("Rewrote imports in {}", path.display());
        }
    }

    info!(
        "Rewrote {} import(s) in {}/{} file(s) under {} (package {})",
        stats.imports_rewritten,
        stats.files_changed,
        stats.files_scanned,
        tree.dest.display(),
        tree.package
    );
    Ok(stats)
}

/// Collects the tree's stub files, sorted for deterministic processing.
fn stub_files(tree: &StubTree) -> Result<Vec<PathBuf>, RewriteError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&tree.dest).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("py")
        {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}
