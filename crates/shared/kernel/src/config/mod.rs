//! Configuration resolution.
//!
//! * [`resolve`] turns the `API_*` environment variables into an immutable [`ApiConfig`].
//!   It never fails: missing, empty or malformed values fall back to the defaults.
//! * [`load_descriptor`] reads and validates the supervisor process descriptor.

mod descriptor;

pub use descriptor::{load_descriptor, validate_descriptor};

use bcore_domain::config::ApiConfig;
use bcore_domain::constants::{DEFAULT_HOST, DEFAULT_PORT, ENV_PREFIX, PORT_ENV};
use config::{Config, Environment, Map};
use serde::Deserialize;
use tracing::{debug, warn};

/// Raw, untyped view of the `API_*` variables.
#[derive(Debug, Default, Deserialize)]
struct RawApiEnv {
    host: Option<String>,
    port: Option<String>,
}

/// Resolves the effective bind configuration from the process environment.
///
/// * `API_HOST`: absent or empty → `0.0.0.0`; any other value is kept verbatim.
/// * `API_PORT`: absent, empty, non-numeric or outside `1..=65535` → `3000`.
///
/// Calling it twice in an unchanged environment yields equal values.
#[must_use]
pub fn resolve() -> ApiConfig {
    resolve_with(None)
}

/// Same as [`resolve`], but reads the variables from `vars` instead of the process
/// environment.
///
/// # Example
/// ```rust
/// use bcore_kernel::config::resolve_from_vars;
///
/// let cfg = resolve_from_vars([("API_HOST", "127.0.0.1"), ("API_PORT", "not-a-number")]);
/// assert_eq!(cfg.to_string(), "127.0.0.1:3000");
/// ```
#[must_use]
pub fn resolve_from_vars<I, K, V>(vars: I) -> ApiConfig
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let source: Map<String, String> =
        vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    resolve_with(Some(source))
}

fn resolve_with(source: Option<Map<String, String>>) -> ApiConfig {
    let raw = read_raw_env(source).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read {ENV_PREFIX}_* variables, using defaults");
        RawApiEnv::default()
    });

    let host = resolve_host(raw.host.as_deref());
    let port = resolve_port(raw.port.as_deref());

    debug!(%host, port, "Resolved effective configuration");
    ApiConfig::new(host, port)
}

fn read_raw_env(source: Option<Map<String, String>>) -> Result<RawApiEnv, config::ConfigError> {
    Config::builder()
        .add_source(Environment::with_prefix(ENV_PREFIX).ignore_empty(true).source(source))
        .build()?
        .try_deserialize::<RawApiEnv>()
}

fn resolve_host(raw: Option<&str>) -> String {
    match raw {
        Some(host) if !host.is_empty() => host.to_owned(),
        _ => DEFAULT_HOST.to_owned(),
    }
}

/// Permissive port parsing: anything that is not a base-10 port in `1..=65535` becomes
/// [`DEFAULT_PORT`]. Non-empty rejects are logged so a typo does not go unnoticed.
fn resolve_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return DEFAULT_PORT;
    };

    match parse_port(raw) {
        Some(port) => port,
        None => {
            warn!(
                variable = PORT_ENV,
                value = raw,
                default = DEFAULT_PORT,
                "Ignoring malformed port, falling back to default"
            );
            DEFAULT_PORT
        },
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port > 0)
}
