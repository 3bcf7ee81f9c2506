//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "cargo xtask")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Developer toolkit for the backend core workspace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Inspect the process supervisor descriptor
    Processes {
        #[command(subcommand)]
        action: ProcessAction,
    },
    /// Run a project
    Run {
        /// Crate to run (auto-prefixes with 'bcore-' if missing)
        #[arg(default_value = "server")]
        project: String,
    },
    /// Run tests (workspace by default)
    Test {
        /// Run tests for a specific crate (auto-prefixes with 'bcore-' if missing)
        project: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProcessAction {
    /// Validate the descriptor (names, commands, instances, port collisions)
    Check {
        /// Descriptor path (defaults to deploy/ecosystem.toml in the workspace)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List declared processes with their bind address
    List {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
