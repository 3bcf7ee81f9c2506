use crate::constants::{
    DEFAULT_API_DESCRIPTION, DEFAULT_API_TITLE, DEFAULT_API_VERSION, DEFAULT_HOST, DEFAULT_PORT,
};
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Resolved bind settings for one process instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConfigInner {
    pub host: String,
    pub port: u16,
}

/// Thin Arc-wrapped effective configuration for inexpensive cloning into subsystems.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConfig {
    #[serde(flatten)]
    inner: Arc<ApiConfigInner>,
}

impl ApiConfig {
    /// Builds a configuration from already validated parts.
    ///
    /// An empty `host` falls back to [`DEFAULT_HOST`]. A `port` of `0` asks the OS for an
    /// ephemeral port; the environment resolver never produces it.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let host = if host.is_empty() { DEFAULT_HOST.to_owned() } else { host };
        Self { inner: Arc::new(ApiConfigInner { host, port }) }
    }

    /// `host:port` with IPv6 literals bracketed.
    #[must_use]
    pub fn authority(&self) -> String {
        format_authority(&self.host, self.port)
    }

    /// Base URL used in operator-facing log lines.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.authority())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Display for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority())
    }
}

/// Formats a `host:port` pair, bracketing bare IPv6 literals.
#[must_use]
pub fn format_authority(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Static metadata published in the API description document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiMetadata {
    pub title: String,
    pub description: String,
    pub version: String,
}

impl ApiMetadata {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self { title: title.into(), description: description.into(), version: version.into() }
    }
}

impl Default for ApiMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_API_TITLE, DEFAULT_API_DESCRIPTION, DEFAULT_API_VERSION)
    }
}
