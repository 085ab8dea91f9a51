//! Shared output formatting for pipeline and lint results.

use anyhow::Result;
use protogate_core::{CheckDiagnostic, PipelineReport, RunResult};

use crate::OutputFormat;

/// Prints a successful pipeline report in the specified format.
pub fn print_report(report: &PipelineReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_prepare_summary(report);
            print_results_text(&report.results);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)?;
            println!("{json}");
        }
        OutputFormat::Compact => print_results_compact(&report.results),
    }
    Ok(())
}

/// Prints the stub-preparation half of a report (generate subcommand).
pub fn print_prepare_summary(report: &PipelineReport) {
    println!(
        "Compiled {} schema unit(s) into {} tree(s){}",
        report.units.len(),
        report.rewrites.len(),
        if report.install_ran {
            " (dependencies installed)"
        } else {
            ""
        }
    );
    for rewrite in &report.rewrites {
        println!(
            "  {}: {} import(s) rewritten in {}/{} file(s)",
            rewrite.package,
            rewrite.stats.imports_rewritten,
            rewrite.stats.files_changed,
            rewrite.stats.files_scanned
        );
    }
}

/// Prints per-target results in the specified format.
pub fn print_results(results: &[RunResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_results_text(results),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(results)?;
            println!("{json}");
        }
        OutputFormat::Compact => print_results_compact(results),
    }
    Ok(())
}

fn print_results_text(results: &[RunResult]) {
    for result in results {
        let status = if result.passed {
            "\x1b[32mpassed\x1b[0m"
        } else {
            "\x1b[31mfailed\x1b[0m"
        };
        println!("target `{}`: {}", result.target, status);

        for diagnostic in &result.diagnostics {
            let report = miette::Report::new(CheckDiagnostic::from(diagnostic));
            print!("{report:?}");
        }
    }

    let failed = results.iter().filter(|r| !r.passed).count();
    let summary_color = if failed > 0 { "\x1b[31m" } else { "\x1b[32m" };
    println!(
        "{}{} target(s) invoked, {} failed\x1b[0m",
        summary_color,
        results.len(),
        failed
    );
}

fn print_results_compact(results: &[RunResult]) {
    for result in results {
        for diagnostic in &result.diagnostics {
            println!("{}: {diagnostic}", result.target);
        }
    }
}
