//! The pipeline driver: install → generate → rewrite → orchestrate.
//!
//! Strictly sequential and fail-fast: each stage's on-disk side effects
//! are a hard precondition for the next, and any stage failure is
//! terminal for the run. There is no partial-success state beyond "which
//! stage and which target failed".

use crate::engine::{AnalysisEngine, EngineError};
use crate::generator::{GenerationError, SchemaCompiler, StubGenerator};
use crate::installer::{DependencyInstaller, InstallError};
use crate::orchestrator::Orchestrator;
use crate::registry::Registry;
use crate::rewriter::{rewrite_tree, RewriteError, RewriteStats};
use crate::schema::{SchemaSourceSet, StubTree};
use crate::types::RunResult;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Terminal failure of a pipeline run, attributed to its stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Dependency installation failed.
    #[error("dependency installation failed: {0}")]
    Install(#[from] InstallError),

    /// Stub generation failed; downstream rewriting and linting on an
    /// incomplete tree would produce misleading diagnostics.
    #[error("stub generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Import rewriting failed; an inconsistently rewritten tree is worse
    /// than no tree.
    #[error("import rewriting failed: {0}")]
    Rewrite(#[from] RewriteError),

    /// The analysis engine itself misbehaved.
    #[error("analysis engine failed: {0}")]
    Engine(#[from] EngineError),

    /// A lint target failed its checks: the designed terminal outcome
    /// when code quality gates fail, not a crash.
    #[error("analysis failed for target `{target}`")]
    Analysis {
        /// Name of the failing target.
        target: String,
        /// Every result up to and including the failure, in order.
        results: Vec<RunResult>,
    },
}

/// Rewrite statistics for one stub tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeRewrite {
    /// Package path of the rewritten tree.
    pub package: String,
    /// Statistics of the rewrite pass.
    pub stats: RewriteStats,
}

/// Report of a fully successful pipeline run.
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    /// Schema units compiled into every tree, sorted by name.
    pub units: Vec<String>,
    /// Whether the install stage actually ran (false: recorded no-op).
    pub install_ran: bool,
    /// Per-tree rewrite statistics, in tree order.
    pub rewrites: Vec<TreeRewrite>,
    /// Per-target analysis results, in registry order.
    pub results: Vec<RunResult>,
}

/// Sequences the pipeline stages over explicit directory values.
///
/// The schema directory, destination trees, and registry are passed in as
/// values (never ambient paths), so the whole pipeline runs unchanged
/// against temporary directories in tests.
pub struct Pipeline<'a, C, E, I>
where
    C: SchemaCompiler,
    E: AnalysisEngine,
    I: DependencyInstaller,
{
    compiler: &'a C,
    engine: &'a E,
    installer: &'a I,
    schema_dir: PathBuf,
    trees: Vec<StubTree>,
    registry: Registry,
}

impl<'a, C, E, I> Pipeline<'a, C, E, I>
where
    C: SchemaCompiler,
    E: AnalysisEngine,
    I: DependencyInstaller,
{
    /// Creates a pipeline over the given collaborators and layout.
    #[must_use]
    pub fn new(
        compiler: &'a C,
        engine: &'a E,
        installer: &'a I,
        schema_dir: impl Into<PathBuf>,
        trees: Vec<StubTree>,
        registry: Registry,
    ) -> Self {
        Self {
            compiler,
            engine,
            installer,
            schema_dir: schema_dir.into(),
            trees,
            registry,
        }
    }

    /// Runs the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; on a lint failure the
    /// [`PipelineError::Analysis`] variant carries every result produced
    /// before the run stopped.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let install_ran = self.install()?;
        let (units, rewrites) = self.prepare_trees()?;
        let results = self.orchestrate()?;

        Ok(PipelineReport {
            units,
            install_ran,
            rewrites,
            results,
        })
    }

    /// Runs only the stub-preparation stages: install, generate both
    /// trees, rewrite both trees.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error.
    pub fn prepare(&self) -> Result<PipelineReport, PipelineError> {
        let install_ran = self.install()?;
        let (units, rewrites) = self.prepare_trees()?;

        Ok(PipelineReport {
            units,
            install_ran,
            rewrites,
            results: Vec::new(),
        })
    }

    /// Runs only the analysis stage against existing trees.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Engine`] when the engine misbehaves, or
    /// [`PipelineError::Analysis`] for a failing target.
    pub fn lint(&self) -> Result<Vec<RunResult>, PipelineError> {
        self.orchestrate()
    }

    fn install(&self) -> Result<bool, PipelineError> {
        info!("Stage 1/4: dependency installation");
        Ok(self.installer.install()?)
    }

    fn prepare_trees(&self) -> Result<(Vec<String>, Vec<TreeRewrite>), PipelineError> {
        info!(
            "Stage 2/4: stub generation from {} into {} tree(s)",
            self.schema_dir.display(),
            self.trees.len()
        );
        let sources = SchemaSourceSet::discover(&self.schema_dir)?;
        let generator = StubGenerator::new(self.compiler);
        for tree in &self.trees {
            generator.generate(&sources, tree)?;
        }

        info!("Stage 3/4: import rewriting");
        let mut rewrites = Vec::with_capacity(self.trees.len());
        for tree in &self.trees {
            let stats = rewrite_tree(tree)?;
            rewrites.push(TreeRewrite {
                package: tree.package.clone(),
                stats,
            });
        }

        Ok((sources.units().to_vec(), rewrites))
    }

    fn orchestrate(&self) -> Result<Vec<RunResult>, PipelineError> {
        info!(
            "Stage 4/4: static analysis over {} target(s)",
            self.registry.len()
        );
        let outcome = Orchestrator::new(self.engine, &self.registry).run()?;

        let failing = outcome.first_failure().map(|r| r.target.clone());
        match failing {
            Some(target) => Err(PipelineError::Analysis {
                target,
                results: outcome.results,
            }),
            None => Ok(outcome.results),
        }
    }
}
