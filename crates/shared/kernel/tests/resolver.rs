use bcore_kernel::config::{load_descriptor, resolve_from_vars};
use bcore_kernel::domain::constants::{DEFAULT_HOST, DEFAULT_PORT};
use bcore_kernel::KernelError;
use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn empty_environment_resolves_to_defaults() {
    let cfg = resolve_from_vars(Vec::<(String, String)>::new());
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, DEFAULT_PORT);
}

#[test]
fn explicit_values_are_used() {
    let cfg = resolve_from_vars([("API_HOST", "127.0.0.1"), ("API_PORT", "8080")]);
    assert_eq!(cfg.to_string(), "127.0.0.1:8080");
}

#[test]
fn malformed_port_falls_back_to_default() {
    for raw in ["abc", "0", "70000", "-5", "8080abc", ""] {
        let cfg = resolve_from_vars([("API_PORT", raw)]);
        assert_eq!(cfg.port, DEFAULT_PORT, "input {raw:?}");
    }
}

#[test]
fn empty_host_falls_back_to_default() {
    let cfg = resolve_from_vars([("API_HOST", ""), ("API_PORT", "4000")]);
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, 4000);
}

#[test]
fn whitespace_host_is_kept_verbatim() {
    for raw in [" ", "  ", "\t"] {
        let cfg = resolve_from_vars([("API_HOST", raw)]);
        assert_eq!(cfg.host, raw, "input {raw:?}");
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}

#[test]
fn unrelated_variables_are_ignored() {
    let cfg = resolve_from_vars([("PORT", "9999"), ("HOSTNAME", "example"), ("API_PORT", "4001")]);
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, 4001);
}

#[test]
fn resolution_is_idempotent() {
    let vars = [("API_HOST", "localhost"), ("API_PORT", "5050")];
    assert_eq!(resolve_from_vars(vars), resolve_from_vars(vars));
}

proptest! {
    #[test]
    fn every_valid_port_round_trips(port in 1u16..=u16::MAX) {
        let cfg = resolve_from_vars([("API_PORT", port.to_string())]);
        prop_assert_eq!(cfg.port, port);
    }

    #[test]
    fn non_numeric_port_never_panics(raw in "[a-zA-Z_ .-]{1,12}") {
        let cfg = resolve_from_vars([("API_PORT", raw)]);
        prop_assert_eq!(cfg.port, DEFAULT_PORT);
    }
}

#[test]
fn descriptor_file_is_loaded_and_validated() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("ecosystem.toml");
    fs::write(
        &path,
        r#"
[[process]]
name = "backend_core"
cwd = "./apps/server"
command = "target/release/bcore-server"
max_memory_restart = "500M"

[process.env]
API_PORT = "3000"
API_HOST = "127.0.0.1"

[[process]]
name = "frontend_dashboard"
cwd = "./apps/dashboard"
command = "node"
args = ["server.js"]

[process.env]
PORT = "3100"
"#,
    )?;

    let descriptor = load_descriptor(&path)?;
    assert_eq!(descriptor.processes.len(), 2);
    assert_eq!(descriptor.processes[0].declared_port(), Some(3000));
    assert_eq!(descriptor.processes[1].declared_port(), Some(3100));
    assert_eq!(descriptor.processes[1].args, vec!["server.js".to_owned()]);
    Ok(())
}

#[test]
fn descriptor_with_port_collision_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("ecosystem.toml");
    fs::write(
        &path,
        r#"
[[process]]
name = "a"
cwd = "."
command = "a"
env = { API_PORT = "3000" }

[[process]]
name = "b"
cwd = "."
command = "b"
env = { PORT = "3000" }
"#,
    )?;

    let err = load_descriptor(&path).unwrap_err();
    assert!(matches!(err, KernelError::Descriptor { .. }), "{err}");
    assert!(err.to_string().contains("already used by 'a'"), "{err}");
    Ok(())
}

#[test]
fn missing_descriptor_is_a_config_error() {
    let err = load_descriptor("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, KernelError::Config { .. }), "{err}");
}
