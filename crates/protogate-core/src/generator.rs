//! Stub generation: the schema-compiler adapter.
//!
//! The schema compiler is an external, versioned tool consumed as a black
//! box: given the shared schema directory and a destination directory it
//! emits a data-structure stub and a service-interface stub per schema
//! unit, using flat same-level imports among its own outputs. The adapter
//! prepares a clean destination, invokes the compiler once per tree, and
//! verifies the expected outputs exist.

use crate::schema::{SchemaSourceSet, StubTree};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from schema compilation and stub-tree preparation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// IO error preparing or inspecting a destination tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The shared schema directory holds no schema units.
    #[error("no schema units found in {0}")]
    NoSchemaUnits(PathBuf),

    /// The compiler executable could not be started.
    #[error("schema compiler `{program}` could not be started: {source}")]
    CompilerLaunch {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The compiler ran but reported failure.
    #[error("schema compiler failed ({status}) generating {dest}:\n{stderr}")]
    CompilerFailed {
        /// Exit status description.
        status: String,
        /// Destination tree being generated.
        dest: PathBuf,
        /// Captured compiler stderr.
        stderr: String,
    },

    /// The compiler reported success but an expected stub file is absent.
    #[error("compiler produced no stub for unit `{unit}`: missing {path}")]
    MissingStub {
        /// Schema unit whose stub is missing.
        unit: String,
        /// Expected stub path.
        path: PathBuf,
    },
}

/// External schema compiler, consumed as a black box.
///
/// Implementations compile every unit of a [`SchemaSourceSet`] into a
/// destination directory, emitting the stub pair named by
/// [`StubTree::stub_files_for`] for each unit.
pub trait SchemaCompiler {
    /// Compiles every unit in `sources` into `dest`.
    ///
    /// # Errors
    ///
    /// Any compilation failure is fatal to the pipeline; there is no retry.
    fn compile(&self, sources: &SchemaSourceSet, dest: &Path) -> Result<(), GenerationError>;
}

/// Command-backed compiler following the grpc-tools protoc convention.
///
/// Runs `<program> <args..> -I=. --python_out=<dest> --grpc_python_out=<dest>
/// <unit files..>` with the schema directory as working directory.
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    /// Creates a compiler invoking `program` with leading `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl SchemaCompiler for CommandCompiler {
    fn compile(&self, sources: &SchemaSourceSet, dest: &Path) -> Result<(), GenerationError> {
        // The compiler runs inside the schema directory, so the destination
        // must be an absolute path to survive the cwd change.
        let dest = if dest.is_absolute() {
            dest.to_path_buf()
        } else {
            std::env::current_dir()?.join(dest)
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("-I=.")
            .arg(format!("--python_out={}", dest.display()))
            .arg(format!("--grpc_python_out={}", dest.display()))
            .args(sources.files())
            .current_dir(sources.dir());

        info!(
            "Running schema compiler: {:?} (cwd: {})",
            cmd,
            sources.dir().display()
        );

        let output = cmd.output().map_err(|e| GenerationError::CompilerLaunch {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(GenerationError::CompilerFailed {
                status: output.status.to_string(),
                dest,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        debug!("Schema compiler finished for {}", dest.display());
        Ok(())
    }
}

/// Adapter that prepares one destination tree per consumer package.
///
/// Invoked once per tree even though the schema set is identical each
/// time, because each tree's rewritten imports differ by package path.
pub struct StubGenerator<'a, C: SchemaCompiler> {
    compiler: &'a C,
}

impl<'a, C: SchemaCompiler> StubGenerator<'a, C> {
    /// Creates a generator backed by `compiler`.
    #[must_use]
    pub fn new(compiler: &'a C) -> Self {
        Self { compiler }
    }

    /// Generates `tree` from `sources`.
    ///
    /// The destination directory is removed and recreated (fully
    /// overwritten, never merged), the compiler is invoked, and every
    /// unit's stub pair is verified to exist.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] on any compiler or filesystem failure,
    /// or when an expected stub file is missing after compilation.
    pub fn generate(
        &self,
        sources: &SchemaSourceSet,
        tree: &StubTree,
    ) -> Result<(), GenerationError> {
        if tree.dest.exists() {
            debug!("Removing previous stub tree at {}", tree.dest.display());
            std::fs::remove_dir_all(&tree.dest)?;
        }
        std::fs::create_dir_all(&tree.dest)?;

        self.compiler.compile(sources, &tree.dest)?;

        for unit in sources.units() {
            for file in StubTree::stub_files_for(unit) {
                let path = tree.dest.join(&file);
                if !path.exists() {
                    return Err(GenerationError::MissingStub {
                        unit: unit.clone(),
                        path,
                    });
                }
            }
        }

        info!(
            "Generated {} unit(s) into {} (package {})",
            sources.units().len(),
            tree.dest.display(),
            tree.package
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Writes the full stub pair for every unit.
    struct CompleteCompiler;

    impl SchemaCompiler for CompleteCompiler {
        fn compile(&self, sources: &SchemaSourceSet, dest: &Path) -> Result<(), GenerationError> {
            for unit in sources.units() {
                for file in StubTree::stub_files_for(unit) {
                    fs::write(dest.join(file), "# stub\n")?;
                }
            }
            Ok(())
        }
    }

    /// Writes only the data-structure stub, dropping the service stub.
    struct PartialCompiler;

    impl SchemaCompiler for PartialCompiler {
        fn compile(&self, sources: &SchemaSourceSet, dest: &Path) -> Result<(), GenerationError> {
            for unit in sources.units() {
                fs::write(dest.join(format!("{unit}_pb2.py")), "# stub\n")?;
            }
            Ok(())
        }
    }

    fn schema_fixture(units: &[&str]) -> (TempDir, SchemaSourceSet) {
        let tmp = TempDir::new().unwrap();
        for unit in units {
            fs::write(tmp.path().join(format!("{unit}.proto")), "").unwrap();
        }
        let sources = SchemaSourceSet::discover(tmp.path()).unwrap();
        (tmp, sources)
    }

    #[test]
    fn generate_replaces_previous_tree() {
        let (_schema, sources) = schema_fixture(&["job"]);
        let dest_root = TempDir::new().unwrap();
        let tree = StubTree::new(dest_root.path().join("compiled"), "pkg.compiled");

        fs::create_dir_all(&tree.dest).unwrap();
        fs::write(tree.dest.join("stale.py"), "old").unwrap();

        StubGenerator::new(&CompleteCompiler)
            .generate(&sources, &tree)
            .unwrap();

        assert!(!tree.dest.join("stale.py").exists());
        assert!(tree.dest.join("job_pb2.py").exists());
        assert!(tree.dest.join("job_pb2_grpc.py").exists());
    }

    #[test]
    fn generate_rejects_missing_service_stub() {
        let (_schema, sources) = schema_fixture(&["job"]);
        let dest_root = TempDir::new().unwrap();
        let tree = StubTree::new(dest_root.path().join("compiled"), "pkg.compiled");

        let err = StubGenerator::new(&PartialCompiler)
            .generate(&sources, &tree)
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingStub { ref unit, .. } if unit == "job"));
    }
}
