use crate::error::{KernelError, KernelErrorExt};
use bcore_domain::config::format_authority;
use bcore_domain::constants::DEFAULT_HOST;
use bcore_domain::process::ProcessDescriptor;
use config::{Config, File, FileFormat};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

/// Loads the supervisor process descriptor from a TOML file and validates it.
///
/// # Errors
/// Returns [`KernelError::Config`] if the file is missing or does not match the
/// descriptor shape, and [`KernelError::Descriptor`] if validation fails.
///
/// # Example
/// ```rust,no_run
/// use bcore_kernel::config::load_descriptor;
///
/// let descriptor = load_descriptor("deploy/ecosystem.toml")?;
/// assert!(!descriptor.processes.is_empty());
/// # Ok::<(), bcore_kernel::KernelError>(())
/// ```
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<ProcessDescriptor, KernelError> {
    let path = path.as_ref();
    info!("Loading process descriptor from {}", path.display());

    let descriptor = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .build()
        .context(format!("Failed to read {}", path.display()))?
        .try_deserialize::<ProcessDescriptor>()
        .context(format!("Failed to deserialize {}", path.display()))?;

    validate_descriptor(&descriptor).context(path.display().to_string())?;

    debug!(processes = descriptor.processes.len(), "Process descriptor loaded");
    Ok(descriptor)
}

/// Checks the descriptor for entries a supervisor could not run side by side.
///
/// Every problem is reported, not just the first one.
///
/// # Errors
/// Returns [`KernelError::Descriptor`] listing each rejected entry when:
/// * no process is declared,
/// * a name is empty or used twice,
/// * a command is empty,
/// * `instances` is zero,
/// * two processes declare the same port.
pub fn validate_descriptor(descriptor: &ProcessDescriptor) -> Result<(), KernelError> {
    if descriptor.processes.is_empty() {
        return Err(KernelError::Descriptor {
            message: "no processes declared".into(),
            context: None,
        });
    }

    let mut problems = Vec::new();
    let mut names = BTreeSet::new();
    let mut ports: BTreeMap<u16, &str> = BTreeMap::new();

    for (index, entry) in descriptor.processes.iter().enumerate() {
        let label = if entry.name.trim().is_empty() {
            problems.push(format!("process #{index} has an empty name"));
            format!("#{index}")
        } else {
            entry.name.clone()
        };

        if !entry.name.trim().is_empty() && !names.insert(entry.name.as_str()) {
            problems.push(format!("process '{label}' is declared more than once"));
        }
        if entry.command.trim().is_empty() {
            problems.push(format!("process '{label}' has an empty command"));
        }
        if entry.instances == 0 {
            problems.push(format!("process '{label}' must run at least one instance"));
        }

        if let Some(port) = entry.declared_port() {
            if let Some(owner) = ports.insert(port, entry.name.as_str()) {
                let host = entry.declared_host().unwrap_or(DEFAULT_HOST);
                problems.push(format!(
                    "process '{label}' binds {} already used by '{owner}'",
                    format_authority(host, port)
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(KernelError::Descriptor { message: problems.join("; ").into(), context: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcore_domain::process::ProcessEntry;
    use std::path::PathBuf;

    fn entry(name: &str, port: Option<&str>) -> ProcessEntry {
        ProcessEntry {
            name: name.to_owned(),
            cwd: PathBuf::from("."),
            command: "run".to_owned(),
            args: Vec::new(),
            instances: 1,
            exec_mode: bcore_domain::process::ExecMode::Fork,
            env: port.map(|p| [("API_PORT".to_owned(), p.to_owned())].into()).unwrap_or_default(),
            max_memory_restart: None,
            kill_timeout_ms: 5_000,
            restart_delay_ms: 1_000,
            error_file: None,
            out_file: None,
            merge_logs: false,
            time: false,
            watch: false,
        }
    }

    fn message(err: KernelError) -> String {
        match err {
            KernelError::Descriptor { message, .. } => message.into_owned(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn distinct_processes_pass() {
        let descriptor = ProcessDescriptor {
            processes: vec![entry("backend", Some("3000")), entry("dashboard", Some("3100"))],
        };
        assert!(validate_descriptor(&descriptor).is_ok());
    }

    #[test]
    fn empty_descriptor_is_rejected() {
        let err = validate_descriptor(&ProcessDescriptor::default()).unwrap_err();
        assert_eq!(message(err), "no processes declared");
    }

    #[test]
    fn port_collision_is_rejected() {
        let descriptor = ProcessDescriptor {
            processes: vec![entry("backend", Some("3000")), entry("dashboard", Some("3000"))],
        };
        let msg = message(validate_descriptor(&descriptor).unwrap_err());
        assert_eq!(msg, "process 'dashboard' binds 0.0.0.0:3000 already used by 'backend'");
    }

    #[test]
    fn all_problems_are_reported() {
        let mut broken = entry("backend", None);
        broken.command = String::new();
        broken.instances = 0;
        let descriptor = ProcessDescriptor { processes: vec![broken, entry("backend", None)] };

        let msg = message(validate_descriptor(&descriptor).unwrap_err());
        assert!(msg.contains("has an empty command"), "{msg}");
        assert!(msg.contains("at least one instance"), "{msg}");
        assert!(msg.contains("declared more than once"), "{msg}");
    }
}
