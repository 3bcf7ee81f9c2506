//! Declarative description of the processes an external supervisor runs.
//!
//! The shape mirrors a supervisor "ecosystem" file: one entry per managed process with
//! its working directory, start command, environment overrides and restart knobs.

use crate::constants::{HOST_ENV, PORT_ENV};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment keys a process may use to declare its listening port.
pub const PORT_KEYS: [&str; 2] = [PORT_ENV, "PORT"];
/// Environment keys a process may use to declare its bind host.
pub const HOST_KEYS: [&str; 2] = [HOST_ENV, "HOSTNAME"];

/// The full set of supervised processes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    #[serde(default, rename = "process")]
    pub processes: Vec<ProcessEntry>,
}

/// One supervised process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub name: String,
    pub cwd: PathBuf,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_instances")]
    pub instances: u32,
    #[serde(default)]
    pub exec_mode: ExecMode,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Restart the process once its resident memory exceeds this ceiling.
    #[serde(default)]
    pub max_memory_restart: Option<MemoryLimit>,
    /// Grace period between SIGTERM and SIGKILL.
    #[serde(default = "default_kill_timeout_ms")]
    pub kill_timeout_ms: u64,
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,
    #[serde(default)]
    pub error_file: Option<PathBuf>,
    #[serde(default)]
    pub out_file: Option<PathBuf>,
    #[serde(default)]
    pub merge_logs: bool,
    /// Prefix captured log lines with timestamps.
    #[serde(default)]
    pub time: bool,
    #[serde(default)]
    pub watch: bool,
}

impl ProcessEntry {
    /// Looks up an environment override, ignoring key case.
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Port declared through the environment overrides, if any parses.
    #[must_use]
    pub fn declared_port(&self) -> Option<u16> {
        PORT_KEYS
            .iter()
            .filter_map(|key| self.env_value(key))
            .find_map(|raw| raw.trim().parse::<u16>().ok().filter(|port| *port > 0))
    }

    /// Host declared through the environment overrides, if any.
    #[must_use]
    pub fn declared_host(&self) -> Option<&str> {
        HOST_KEYS.iter().find_map(|key| self.env_value(key))
    }
}

const fn default_instances() -> u32 {
    1
}

const fn default_kill_timeout_ms() -> u64 {
    5_000
}

const fn default_restart_delay_ms() -> u64 {
    1_000
}

/// How the supervisor spawns instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    #[default]
    Fork,
    Cluster,
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Fork => "fork",
            Self::Cluster => "cluster",
        })
    }
}

/// A memory ceiling such as `500M` or `1G`, stored in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemoryLimit(u64);

impl MemoryLimit {
    #[must_use]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn bytes(self) -> u64 {
        self.0
    }
}

/// Returned when a memory limit string is not `<digits>[K|M|G]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMemoryLimitError(String);

impl fmt::Display for ParseMemoryLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid memory limit '{}', expected e.g. 512K, 500M or 1G", self.0)
    }
}

impl std::error::Error for ParseMemoryLimitError {}

impl FromStr for MemoryLimit {
    type Err = ParseMemoryLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let err = || ParseMemoryLimitError(s.to_owned());

        let (digits, shift) = match raw.chars().last().map(|c| c.to_ascii_uppercase()) {
            Some('K') => (&raw[..raw.len() - 1], 10),
            Some('M') => (&raw[..raw.len() - 1], 20),
            Some('G') => (&raw[..raw.len() - 1], 30),
            Some(c) if c.is_ascii_digit() => (raw, 0),
            _ => return Err(err()),
        };

        let value = digits.parse::<u64>().map_err(|_| err())?;
        if value == 0 {
            return Err(err());
        }
        value.checked_mul(1 << shift).map(Self).ok_or_else(err)
    }
}

impl TryFrom<String> for MemoryLimit {
    type Error = ParseMemoryLimitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemoryLimit> for String {
    fn from(value: MemoryLimit) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MemoryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(u32, char); 3] = [(30, 'G'), (20, 'M'), (10, 'K')];
        for (shift, unit) in UNITS {
            let size = 1_u64 << shift;
            if self.0 >= size && self.0 % size == 0 {
                return write!(f, "{}{unit}", self.0 / size);
            }
        }
        write!(f, "{}", self.0)
    }
}
