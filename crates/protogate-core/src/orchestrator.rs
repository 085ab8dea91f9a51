//! The analysis orchestrator: one interpreter loop over the registry.

use crate::engine::{AnalysisEngine, EngineError};
use crate::registry::Registry;
use crate::types::RunOutcome;
use tracing::{debug, info, warn};

/// Iterates the registry in order and invokes the engine per target,
/// aggregating pass/fail with fail-fast semantics: the first failing
/// target ends the run and later targets are never invoked.
pub struct Orchestrator<'a, E: AnalysisEngine> {
    engine: &'a E,
    registry: &'a Registry,
}

impl<'a, E: AnalysisEngine> Orchestrator<'a, E> {
    /// Creates an orchestrator over `registry` backed by `engine`.
    #[must_use]
    pub fn new(engine: &'a E, registry: &'a Registry) -> Self {
        Self { engine, registry }
    }

    /// Runs every target in registry order, stopping at the first failure.
    ///
    /// A failing lint is a normal outcome: it comes back as
    /// `Ok(outcome)` with `outcome.passed() == false` and the failing
    /// target's result last.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine itself misbehaves
    /// (cannot start, crashes without diagnostics).
    pub fn run(&self) -> Result<RunOutcome, EngineError> {
        let mut outcome = RunOutcome::default();

        for target in self.registry.targets() {
            info!(
                "Analyzing target `{}` ({} profile, root {})",
                target.name,
                target.profile,
                target.root.display()
            );

            let mut result = self.engine.analyze(target)?;

            // Exclusions are forwarded to the engine, but a diagnostic
            // from an excluded path must never fail the run even if the
            // engine reports one anyway.
            result.diagnostics.retain(|d| {
                let keep = !target.is_excluded(&d.location.file);
                if !keep {
                    debug!(
                        "Dropping diagnostic from excluded path {}",
                        d.location.file.display()
                    );
                }
                keep
            });
            if !result.passed && result.diagnostics.is_empty() {
                // Every finding came from excluded paths.
                result.passed = true;
            }

            let passed = result.passed;
            outcome.results.push(result);

            if !passed {
                warn!(
                    "Target `{}` failed; skipping remaining targets",
                    target.name
                );
                break;
            }
        }

        info!(
            "Orchestration complete: {}/{} target(s) invoked, {}",
            outcome.results.len(),
            self.registry.len(),
            if outcome.passed() { "all passed" } else { "failed" }
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{LintTarget, Profile};
    use crate::types::{Diagnostic, Location, RunResult};
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Fake engine failing a fixed set of targets, recording invocations.
    struct ScriptedEngine {
        failing: HashSet<String>,
        invoked: RefCell<Vec<String>>,
    }

    impl ScriptedEngine {
        fn failing_on<const N: usize>(names: [&str; N]) -> Self {
            Self {
                failing: names.iter().map(|s| (*s).to_string()).collect(),
                invoked: RefCell::new(Vec::new()),
            }
        }
    }

    impl AnalysisEngine for ScriptedEngine {
        fn analyze(&self, target: &LintTarget) -> Result<RunResult, EngineError> {
            self.invoked.borrow_mut().push(target.name.clone());
            if self.failing.contains(&target.name) {
                Ok(RunResult::fail(
                    &target.name,
                    vec![Diagnostic::new(
                        "C0301",
                        "Line too long",
                        Location::new("api.py", 3, 0),
                    )],
                ))
            } else {
                Ok(RunResult::pass(&target.name))
            }
        }
    }

    fn three_target_registry() -> Registry {
        Registry::new(vec![
            LintTarget::new("a", "a", Profile::Main),
            LintTarget::new("a-tests", "a", Profile::Test),
            LintTarget::new("b", "b", Profile::Main),
        ])
        .unwrap()
    }

    #[test]
    fn all_passing_invokes_every_target() {
        let engine = ScriptedEngine::failing_on([]);
        let registry = three_target_registry();
        let outcome = Orchestrator::new(&engine, &registry).run().unwrap();

        assert!(outcome.passed());
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(*engine.invoked.borrow(), ["a", "a-tests", "b"]);
    }

    #[test]
    fn first_failure_stops_the_run() {
        let engine = ScriptedEngine::failing_on(["a-tests"]);
        let registry = three_target_registry();
        let outcome = Orchestrator::new(&engine, &registry).run().unwrap();

        assert!(!outcome.passed());
        assert_eq!(outcome.results.len(), 2);
        assert!(!outcome.results[1].passed);
        // Target after the failure is never invoked
        assert_eq!(*engine.invoked.borrow(), ["a", "a-tests"]);
    }

    #[test]
    fn diagnostics_from_excluded_paths_are_dropped() {
        struct LeakyEngine;

        impl AnalysisEngine for LeakyEngine {
            fn analyze(&self, target: &LintTarget) -> Result<RunResult, EngineError> {
                Ok(RunResult::fail(
                    &target.name,
                    vec![Diagnostic::new(
                        "C0114",
                        "Missing module docstring",
                        Location::new("compiled/job_pb2.py", 1, 0),
                    )],
                ))
            }
        }

        let registry = Registry::new(vec![LintTarget::new("a", "a", Profile::Main)
            .with_exclude(["compiled/*"])])
        .unwrap();
        let outcome = Orchestrator::new(&LeakyEngine, &registry).run().unwrap();

        assert!(outcome.passed());
        assert!(outcome.results[0].diagnostics.is_empty());
    }
}
