//! # Backend Core Server
//!
//! Bootstrap sequencer for the backend core: builds the application, resolves the bind
//! configuration, publishes the API description and listens until a termination signal.
//!
//! ## Example
//! ```no_run
//! use bcore_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bcore_server::BootError> {
//!     Server::builder().build()?.run().await
//! }
//! ```

mod error;
mod router;
mod stage;

pub use crate::error::BootError;
pub use crate::stage::BootStage;

use crate::stage::StageTracker;
use axum::Router;
use axum_server::Handle;
use bcore_kernel::config::resolve;
use bcore_kernel::domain::config::{ApiConfig, ApiMetadata, format_authority};
use bcore_kernel::domain::constants::DOCS_PATH;
use bcore_kernel::server::ApiDescription;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct ServerBuilder {
    config: Option<ApiConfig>,
    metadata: ApiMetadata,
    shutdown_timeout: Duration,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            config: None,
            metadata: ApiMetadata::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl ServerBuilder {
    /// Uses `cfg` instead of resolving `API_HOST` / `API_PORT` from the environment.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.config = Some(cfg);
        self
    }

    pub fn metadata(mut self, metadata: ApiMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Upper bound for draining in-flight requests once shutdown starts.
    pub const fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Runs the startup stages up to [`BootStage::DocsPublished`].
    ///
    /// # Process
    /// 1. Registers the application routes ([`BootStage::ApplicationBuilt`])
    /// 2. Resolves the bind configuration ([`BootStage::ConfigResolved`])
    /// 3. Builds and mounts the API description ([`BootStage::DocsPublished`])
    ///
    /// # Errors
    /// Returns [`BootError::Application`] if the application cannot be assembled.
    pub fn build(self) -> Result<Server, BootError> {
        let stage = StageTracker::new();

        let app = router::application(&self.metadata)?;
        stage.advance(BootStage::ApplicationBuilt)?;

        let config = self.config.unwrap_or_else(resolve);
        stage.advance(BootStage::ConfigResolved)?;

        let (router, docs) = router::publish(app, &self.metadata);
        stage.advance(BootStage::DocsPublished)?;

        info!(
            host = %config.host,
            port = config.port,
            endpoints = docs.endpoints().len(),
            "Server initialized"
        );

        let handle = ServerHandle {
            inner: Handle::new(),
            stage: stage.subscribe(),
            shutdown_timeout: self.shutdown_timeout,
        };

        Ok(Server { config, docs, router, stage, handle })
    }
}

/// A fully initialized server, ready to listen.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    config: ApiConfig,
    docs: ApiDescription,
    router: Router,
    stage: StageTracker,
    handle: ServerHandle,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub const fn docs(&self) -> &ApiDescription {
        &self.docs
    }

    #[must_use]
    pub fn stage(&self) -> BootStage {
        self.stage.current()
    }

    /// Handle for observing readiness and stopping the server from another task.
    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Binds the listener and serves until SIGINT, SIGTERM or [`ServerHandle::shutdown`].
    ///
    /// Once the socket is bound the two readiness lines are logged with the bound address.
    ///
    /// # Errors
    /// Returns [`BootError::Bind`] if the host cannot be resolved or the address cannot be
    /// bound (port in use, permission denied). There is no retry.
    pub async fn run(self) -> Result<(), BootError> {
        let Self { config, router, stage, handle, .. } = self;
        let address = resolve_address(&config).await?;

        let signals = tokio::spawn(watch_signals(handle.clone()));

        let serve = axum_server::bind(address)
            .handle(handle.inner.clone())
            .serve(router.into_make_service());
        let ready = report_ready(&handle, &stage, &config.host);

        tokio::pin!(serve);
        let served = tokio::select! {
            served = &mut serve => served,
            () = ready => serve.await,
        };
        signals.abort();

        served.map_err(|source| BootError::Bind {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Cloneable control handle of a [`Server`].
#[derive(Debug, Clone)]
pub struct ServerHandle {
    inner: Handle<SocketAddr>,
    stage: watch::Receiver<BootStage>,
    shutdown_timeout: Duration,
}

impl ServerHandle {
    /// Waits until the server reaches [`BootStage::Listening`] and returns the bound
    /// address, or `None` if binding failed.
    pub async fn listening(&self) -> Option<SocketAddr> {
        // Errors once `run` has returned without reaching `Listening`.
        self.stage.clone().wait_for(|stage| *stage == BootStage::Listening).await.ok()?;
        self.inner.listening().await
    }

    #[must_use]
    pub fn stage(&self) -> BootStage {
        *self.stage.borrow()
    }

    /// Stops accepting connections and drains in-flight requests.
    pub fn shutdown(&self) {
        info!(timeout = ?self.shutdown_timeout, "Starting graceful shutdown...");
        self.inner.graceful_shutdown(Some(self.shutdown_timeout));
    }
}

async fn resolve_address(config: &ApiConfig) -> Result<SocketAddr, BootError> {
    let bind_error = |source| BootError::Bind { host: config.host.clone(), port: config.port, source };

    tokio::net::lookup_host((config.host.as_str(), config.port))
        .await
        .map_err(bind_error)?
        .next()
        .ok_or_else(|| {
            bind_error(io::Error::new(io::ErrorKind::NotFound, "host resolved to no address"))
        })
}

async fn report_ready(handle: &ServerHandle, stage: &StageTracker, host: &str) {
    let Some(bound) = handle.inner.listening().await else {
        return;
    };
    if let Err(e) = stage.advance(BootStage::Listening) {
        warn!(error = %e, "Unexpected boot stage");
    }

    let base = format!("http://{}", format_authority(host, bound.port()));
    info!("Application is running on: {base}");
    info!("API docs available at: {base}{DOCS_PATH}");
}

async fn watch_signals(handle: ServerHandle) {
    match shutdown_signal().await {
        Ok(()) => {
            info!("Shutdown signal received");
            handle.shutdown();
        },
        Err(e) => error!(error = %e, "Failed to listen for shutdown signals"),
    }
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM (sent by process supervisors).
async fn shutdown_signal() -> io::Result<()> {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())?.recv().await;
        Ok::<_, io::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<io::Result<()>>();

    tokio::select! {
        res = ctrl_c => res,
        res = terminate => res,
    }
}
