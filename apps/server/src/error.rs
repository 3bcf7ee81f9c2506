use crate::stage::BootStage;
use bcore_kernel::domain::config::format_authority;
use std::borrow::Cow;

/// Fatal startup failures. Each one ends the process with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// The application could not be assembled.
    #[error("Application construction failed{}: {message}", format_context(.context))]
    Application { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The listen address could not be resolved or bound.
    #[error("Failed to listen on {}: {source}", authority(.host, .port))]
    Bind { host: String, port: u16, source: std::io::Error },

    #[error("Boot stage out of order: {from} -> {to}")]
    OutOfOrder { from: BootStage, to: BootStage },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn authority(host: &str, port: &u16) -> String {
    format_authority(host, *port)
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
