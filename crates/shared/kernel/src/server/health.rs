use bcore_domain::constants::{APP_TAG, GREETING};

/// Health check endpoint
///
/// Returns the fixed greeting while the process is able to serve HTTP requests.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "Returns hello message", body = String, content_type = "text/plain")
    ),
    tag = APP_TAG,
)]
pub(super) async fn hello_handler() -> &'static str {
    GREETING
}
