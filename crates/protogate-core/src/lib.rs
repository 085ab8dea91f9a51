//! # protogate-core
//!
//! Build/validation pipeline for packages that share a single
//! protocol-buffer schema directory. The pipeline prepares one generated
//! stub tree per consumer package, rewrites the stubs' inter-file imports
//! so each tree resolves under its consumer's namespace, and then runs a
//! static-analysis engine over an ordered registry of lint targets.
//!
//! The three external collaborators (schema compiler, analysis engine,
//! dependency installer) are consumed behind narrow traits so the core
//! logic can be tested with fakes:
//!
//! - [`SchemaCompiler`] for stub generation
//! - [`AnalysisEngine`] for static analysis
//! - [`DependencyInstaller`] for pre-generation dependency setup
//!
//! ## Example
//!
//! ```ignore
//! use protogate_core::{Config, Pipeline};
//!
//! let config = Config::from_file("protogate.toml".as_ref())?;
//! let compiler = config.command_compiler();
//! let engine = config.command_engine(base);
//! let installer = config.command_installer(base);
//!
//! let pipeline = Pipeline::new(
//!     &compiler,
//!     &engine,
//!     &installer,
//!     config.schema_dir_in(base),
//!     config.stub_trees(base),
//!     config.registry(base)?,
//! );
//!
//! let report = pipeline.run()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod generator;
mod installer;
mod orchestrator;
mod pipeline;
mod registry;
mod rewriter;
mod schema;
mod types;

pub use config::{
    CompilerConfig, Config, ConfigError, EngineConfig, InstallerConfig, ProfileConfig, TargetConfig,
    TreeConfig,
};
pub use engine::{AnalysisEngine, CommandEngine, EngineError, ProfileSet};
pub use generator::{CommandCompiler, GenerationError, SchemaCompiler, StubGenerator};
pub use installer::{CommandInstaller, DependencyInstaller, InstallError};
pub use orchestrator::Orchestrator;
pub use pipeline::{Pipeline, PipelineError, PipelineReport, TreeRewrite};
pub use registry::{LintTarget, Profile, Registry, RegistryError};
pub use rewriter::{rewrite_tree, RewriteError, RewriteStats};
pub use schema::{SchemaSourceSet, StubTree};
pub use types::{CheckDiagnostic, Diagnostic, Location, RunOutcome, RunResult};
