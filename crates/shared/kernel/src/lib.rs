//! Kernel utilities shared by the service binaries.
//! Keep this crate lightweight: configuration resolution, the process descriptor loader and,
//! behind the `server` feature, the HTTP handlers and the API description publisher.
//!
//! ## Resolving the bind address
//! ```rust
//! use bcore_kernel::config::resolve_from_vars;
//!
//! let cfg = resolve_from_vars([("API_PORT", "8080")]);
//! assert_eq!(cfg.host, "0.0.0.0");
//! assert_eq!(cfg.port, 8080);
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "server")]
pub mod server;

pub use bcore_domain as domain;
pub use error::{KernelError, KernelErrorExt};
