//! Schema source discovery and stub tree descriptors.

use crate::generator::GenerationError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of a schema unit file.
const SCHEMA_EXTENSION: &str = "proto";

/// The shared, ordered set of schema unit files feeding every stub tree.
///
/// Units are sorted by name at discovery time so that compiler invocations
/// and verification run in a deterministic order. The source directory is
/// never mutated by the pipeline.
#[derive(Debug, Clone)]
pub struct SchemaSourceSet {
    dir: PathBuf,
    units: Vec<String>,
}

impl SchemaSourceSet {
    /// Discovers schema units by listing `*.proto` files directly in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoSchemaUnits`] when the directory holds
    /// no schema files, and an IO error when it cannot be read.
    pub fn discover(dir: &Path) -> Result<Self, GenerationError> {
        let mut units = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SCHEMA_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                debug!("Found schema unit: {}", stem);
                units.push(stem.to_string());
            }
        }

        if units.is_empty() {
            return Err(GenerationError::NoSchemaUnits(dir.to_path_buf()));
        }

        units.sort();

        Ok(Self {
            dir: dir.to_path_buf(),
            units,
        })
    }

    /// Returns the shared schema directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the unit stems (e.g. `job` for `job.proto`), sorted by name.
    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Returns the unit file names (e.g. `job.proto`), sorted by name.
    #[must_use]
    pub fn files(&self) -> Vec<String> {
        self.units
            .iter()
            .map(|u| format!("{u}.{SCHEMA_EXTENSION}"))
            .collect()
    }
}

/// One consumer package's generated stub tree.
///
/// Each consumer gets its own tree: trees are never shared or symlinked
/// because the rewritten imports differ by destination package path. A
/// tree is fully overwritten on every pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubTree {
    /// Destination directory the stubs are compiled into.
    pub dest: PathBuf,
    /// Dotted package path of the tree's installed location
    /// (e.g. `pycore.compiled_proto`).
    pub package: String,
}

impl StubTree {
    /// Creates a stub tree descriptor.
    #[must_use]
    pub fn new(dest: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            package: package.into(),
        }
    }

    /// Stub file names the compiler must emit for one schema unit:
    /// the data-structure stub and the service-interface stub.
    #[must_use]
    pub fn stub_files_for(unit: &str) -> [String; 2] {
        [format!("{unit}_pb2.py"), format!("{unit}_pb2_grpc.py")]
    }
}
