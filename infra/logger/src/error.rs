use std::borrow::Cow;

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The rolling file appender could not be created (unwritable directory, bad prefix).
    #[error("Rolling file appender error{}: {source}", format_context(.context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// A global subscriber is already installed in this process.
    #[error("Tracing subscriber error{}: {source}", format_context(.context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    /// Log directory could not be prepared.
    #[error("Log directory error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid logger configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn format_context(context: &Option<Cow<'static, str>>) -> String {
    context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
}

impl From<tracing_appender::rolling::InitError> for LoggerError {
    fn from(source: tracing_appender::rolling::InitError) -> Self {
        Self::Appender { source, context: None }
    }
}

impl From<tracing_subscriber::util::TryInitError> for LoggerError {
    fn from(source: tracing_subscriber::util::TryInitError) -> Self {
        Self::Subscriber { source, context: None }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

/// Attaches a human-readable context to logger failures.
pub trait LoggerErrorExt<T> {
    /// # Errors
    /// Returns the original error with `context` attached.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, LoggerError>;
}

impl<T, E> LoggerErrorExt<T> for Result<T, E>
where
    E: Into<LoggerError>,
{
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, LoggerError> {
        self.map_err(|e| {
            let mut err = e.into();
            match &mut err {
                LoggerError::Appender { context: slot, .. }
                | LoggerError::Subscriber { context: slot, .. }
                | LoggerError::Io { context: slot, .. }
                | LoggerError::InvalidConfiguration { context: slot, .. } => {
                    *slot = Some(context.into());
                },
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_rendered_in_message() {
        let err: Result<(), LoggerError> = Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
        let err = err.context("bcore-server").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid logger configuration (bcore-server): max_files must be greater than zero"
        );
    }

    #[test]
    fn io_errors_convert_with_context() {
        let io: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = io.context("Failed to create /var/log/bcore").unwrap_err();
        assert!(matches!(err, LoggerError::Io { .. }));
        assert!(err.to_string().contains("/var/log/bcore"));
    }
}
