use std::borrow::Cow;

/// Errors raised while loading configuration sources.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid process descriptor{}: {message}", format_context(.context))]
    Descriptor { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches a human-readable context to a failing result.
pub trait KernelErrorExt<T> {
    /// # Errors
    /// Returns the original error, converted into [`KernelError`] and annotated.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, KernelError>;
}

impl<T> KernelErrorExt<T> for Result<T, KernelError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                KernelError::Config { context: c, .. }
                | KernelError::Descriptor { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> KernelErrorExt<T> for Result<T, config::ConfigError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, KernelError> {
        self.map_err(|source| KernelError::Config { source, context: Some(context.into()) })
    }
}

impl From<config::ConfigError> for KernelError {
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
