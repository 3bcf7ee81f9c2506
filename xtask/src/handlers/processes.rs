use crate::services::utils::descriptor_path;
use anyhow::{Context, Result};
use bcore_kernel::config::load_descriptor;
use bcore_kernel::domain::config::format_authority;
use bcore_kernel::domain::constants::DEFAULT_HOST;
use bcore_kernel::domain::process::ProcessEntry;
use std::path::Path;

/// Validates the process descriptor.
///
/// # Errors
/// Returns an error listing every problem if the descriptor cannot be loaded or is invalid.
pub fn check(file: Option<&Path>) -> Result<()> {
    let path = descriptor_path(file)?;
    let descriptor = load_descriptor(&path)
        .with_context(|| format!("Process descriptor {} is invalid", path.display()))?;

    println!("✅ {} OK: {} process(es) declared", path.display(), descriptor.processes.len());
    Ok(())
}

/// Prints every declared process with its bind address.
///
/// # Errors
/// Returns an error if the descriptor cannot be loaded or is invalid.
pub fn list(file: Option<&Path>) -> Result<()> {
    let path = descriptor_path(file)?;
    let descriptor = load_descriptor(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    println!("\nProcesses ({}):\n", path.display());
    println!("{:<22} {:<10} {:<8} {:<22} {:<30}", "Name", "Instances", "Mode", "Bind", "Command");
    println!("{:-<95}", "");

    for entry in &descriptor.processes {
        println!(
            "{:<22} {:<10} {:<8} {:<22} {:<30}",
            entry.name,
            entry.instances,
            entry.exec_mode,
            bind_label(entry),
            command_line(entry)
        );
    }
    println!();
    Ok(())
}

fn bind_label(entry: &ProcessEntry) -> String {
    entry.declared_port().map_or_else(
        || "-".to_owned(),
        |port| format_authority(entry.declared_host().unwrap_or(DEFAULT_HOST), port),
    )
}

fn command_line(entry: &ProcessEntry) -> String {
    std::iter::once(entry.command.as_str())
        .chain(entry.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
