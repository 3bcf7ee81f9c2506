//! # Logger
//!
//! Installs the global `tracing` subscriber for the service binaries.
//!
//! Output goes to the console (compact, coloured), to a rolling file in a log
//! directory, or both. File output can be switched to JSON lines for log shippers.
//! `RUST_LOG` is honoured on top of the configured level unless an explicit
//! [`LoggerBuilder::env_filter`] is given.
//!
//! ```rust
//! use bcore_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("bcore-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Line format used for the log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Text,
    Json,
}

/// Configures and installs the global subscriber. Obtained from [`Logger::builder`].
#[derive(Debug)]
#[must_use = "The builder does nothing until `init` is called."]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    directory: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    format: FileFormat,
    env_filter: Option<String>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            console: true,
            directory: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            format: FileFormat::Text,
            env_filter: None,
        }
    }
}

impl LoggerBuilder {
    /// Application name; also the prefix of rolling log files (`bcore-server.2026-10-19.log`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Explicit filter directives (`bcore_server=debug,tower_http=info`).
    ///
    /// Replaces `RUST_LOG`. Invalid directives make [`LoggerBuilder::init`] fail.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Writes a rolling log file into `directory`, creating it if needed.
    pub fn path(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Switches the log file to JSON lines. Console output stays human-readable.
    pub const fn json(mut self) -> Self {
        self.format = FileFormat::Json;
        self
    }

    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Installs the subscriber.
    ///
    /// Keep the returned [`Logger`] alive for the whole process: dropping it stops the
    /// background file writer.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`]: empty name, `max_files == 0`, invalid
    ///   filter, or neither console nor file output enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`]: the log directory is unusable.
    /// * [`LoggerError::Subscriber`]: a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let filter = self.build_filter()?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match &self.directory {
            Some(directory) => {
                let (file_layer, guard) = self.file_layer(directory)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        tracing::debug!(
            name = %self.name,
            level = %self.level,
            directory = ?self.directory,
            "Logger initialized"
        );
        Ok(Logger { name: self.name, directory: self.directory, guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        let problem = if self.name.trim().is_empty() {
            Some("Logger name cannot be empty")
        } else if self.max_files == 0 {
            Some("max_files must be greater than zero")
        } else if !self.console && self.directory.is_none() {
            Some("No output enabled. Enable the console or set a log directory.")
        } else {
            None
        };

        problem.map_or(Ok(()), |message| {
            Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
        })
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            None => Ok(builder.from_env_lossy()),
            Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            }),
        }
    }

    fn file_layer<S>(
        &self,
        directory: &Path,
    ) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard), LoggerError>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fs::create_dir_all(directory)
            .context(format!("Failed to create {}", directory.display()))?;

        let appender = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(&self.name)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.max_files)
            .build(directory)
            .context(directory.display().to_string())?;

        let (writer, guard) = tracing_appender::non_blocking(appender);
        let base = layer().with_writer(writer).with_ansi(false);
        let boxed = match self.format {
            FileFormat::Text => base.boxed(),
            FileFormat::Json => base.json().boxed(),
        };
        Ok((boxed, guard))
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct Logger {
    name: String,
    directory: Option<PathBuf>,
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the rolling log files, if file output is enabled.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!(name = %self.name, "Logging system shutting down, flushing buffers...");
        }
    }
}
