use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Descriptor consumed by the process supervisor, relative to the workspace root.
pub const DESCRIPTOR_PATH: &str = "deploy/ecosystem.toml";

const CRATE_PREFIX: &str = "bcore-";

/// Returns the root directory of the workspace.
///
/// # Errors
/// Returns an error if the manifest directory does not have a parent.
pub fn get_project_root() -> Result<PathBuf> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .context("Could not find project root from xtask manifest")
}

/// `file` if given, otherwise the workspace descriptor.
///
/// # Errors
/// Returns an error if the workspace root cannot be located.
pub fn descriptor_path(file: Option<&Path>) -> Result<PathBuf> {
    match file {
        Some(file) => Ok(file.to_path_buf()),
        None => Ok(get_project_root()?.join(DESCRIPTOR_PATH)),
    }
}

/// Normalizes a project crate name to the workspace naming convention.
#[must_use]
pub fn normalize_project_name(project: &str) -> String {
    if project.starts_with(CRATE_PREFIX) {
        project.to_owned()
    } else {
        format!("{CRATE_PREFIX}{project}")
    }
}
