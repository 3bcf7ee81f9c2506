//! Well-known names shared by the resolver, the router and the tooling.

/// Prefix of the environment variables read by the configuration resolver.
pub const ENV_PREFIX: &str = "API";
/// Bind host variable.
pub const HOST_ENV: &str = "API_HOST";
/// Bind port variable.
pub const PORT_ENV: &str = "API_PORT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Liveness route.
pub const HEALTH_PATH: &str = "/";
/// Interactive API reference.
pub const DOCS_PATH: &str = "/docs";
/// Machine-readable `OpenAPI` document.
pub const DOCS_JSON_PATH: &str = "/docs-json";

/// Fixed body returned by the liveness route.
pub const GREETING: &str = "Hello World!";

/// `OpenAPI` tag grouping the application endpoints.
pub const APP_TAG: &str = "App";

pub const DEFAULT_API_TITLE: &str = "App API";
pub const DEFAULT_API_DESCRIPTION: &str = "App backend API documentation";
pub const DEFAULT_API_VERSION: &str = "1.0";
