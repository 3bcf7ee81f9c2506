#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{processes, run, testing};
use crate::models::args::{AppCommands, Cli, ProcessAction};

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        AppCommands::Processes { action } => match action {
            ProcessAction::Check { file } => processes::check(file.as_deref())?,
            ProcessAction::List { file } => processes::list(file.as_deref())?,
        },
        AppCommands::Run { project } => run::run_project(&project)?,
        AppCommands::Test { project } => testing::run_tests(project.as_deref())?,
    }

    Ok(())
}
