//! protogate CLI tool.
//!
//! Usage:
//! ```bash
//! protogate run [PATH]
//! protogate generate [PATH]
//! protogate lint [PATH]
//! protogate list-targets [PATH]
//! protogate init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Shared-schema stub generation and lint pipeline for multi-package repos
#[derive(Parser)]
#[command(name = "protogate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: install, generate, rewrite, lint
    Run {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate and rewrite the stub trees without linting
    Generate {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Lint against existing stub trees without regenerating
    Lint {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the configured lint target registry
    ListTargets {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for run results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { path, format } => commands::run::run(&path, format, cli.config.as_deref()),
        Commands::Generate { path } => commands::generate::run(&path, cli.config.as_deref()),
        Commands::Lint { path, format } => {
            commands::lint::run(&path, format, cli.config.as_deref())
        }
        Commands::ListTargets { path } => commands::list_targets::run(&path, cli.config.as_deref()),
        Commands::Init { force } => commands::init::run(force),
    }
}
