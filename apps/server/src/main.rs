use anyhow::Context;
use bcore_logger::{LevelFilter, Logger};
use bcore_server::Server;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

/// Backend core HTTP service. Bind address comes from `API_HOST` / `API_PORT`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Minimum level emitted; `RUST_LOG` directives still apply on top.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Also write rolling log files into this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Write the log files as JSON lines.
    #[arg(long, requires = "log_dir")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(args.log_level);
    if let Some(dir) = args.log_dir {
        logger = logger.path(dir);
        if args.json_logs {
            logger = logger.json();
        }
    }
    let _log = logger.init().context("Failed to initialize logging")?;

    let result = match Server::builder().build() {
        Ok(server) => server.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error = %e, "Fatal startup failure");
        return Err(e.into());
    }
    Ok(())
}
