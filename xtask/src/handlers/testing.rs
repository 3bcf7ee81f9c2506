use crate::services::utils::normalize_project_name;

/// Runs tests in the workspace or a specific crate, with every feature enabled.
///
/// # Errors
/// Returns an error if the test run fails or cargo cannot be spawned.
pub fn run_tests(project: Option<&str>) -> anyhow::Result<()> {
    let mut args: Vec<String> = vec!["test".into()];

    match project.filter(|value| *value != "all") {
        Some(project) => {
            let normalized = normalize_project_name(project);
            println!("🧪 Running tests for {normalized}...");
            args.extend(["-p".into(), normalized]);
        },
        None => {
            println!("🧪 Running workspace tests...");
            args.push("--workspace".into());
        },
    }
    args.push("--all-features".into());

    let status = std::process::Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("Tests failed!");
    }
    Ok(())
}
