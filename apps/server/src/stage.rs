use crate::error::BootError;
use std::fmt;
use tokio::sync::watch;
use tracing::debug;

/// Startup progress, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BootStage {
    Uninitialized,
    ApplicationBuilt,
    ConfigResolved,
    DocsPublished,
    Listening,
}

impl BootStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::ApplicationBuilt => "application_built",
            Self::ConfigResolved => "config_resolved",
            Self::DocsPublished => "docs_published",
            Self::Listening => "listening",
        }
    }
}

impl fmt::Display for BootStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, observable boot stage. Cloned receivers see every transition.
#[derive(Debug)]
pub(crate) struct StageTracker {
    tx: watch::Sender<BootStage>,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(BootStage::Uninitialized);
        Self { tx }
    }

    pub(crate) fn current(&self) -> BootStage {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<BootStage> {
        self.tx.subscribe()
    }

    /// Moves to `next`, which must come after the current stage.
    pub(crate) fn advance(&self, next: BootStage) -> Result<(), BootError> {
        let from = self.current();
        if next <= from {
            return Err(BootError::OutOfOrder { from, to: next });
        }
        self.tx.send_replace(next);
        debug!(stage = %next, "Boot stage reached");
        Ok(())
    }
}
