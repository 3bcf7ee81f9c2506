use crate::error::BootError;
use axum::Router;
use bcore_kernel::domain::config::ApiMetadata;
use bcore_kernel::server::ApiDescription;
use bcore_kernel::server::router::app_router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

#[derive(OpenApi)]
struct ApiDoc;

/// Registers the application routes. Metadata is checked here so a broken build fails
/// before anything is resolved or bound.
pub(crate) fn application(metadata: &ApiMetadata) -> Result<OpenApiRouter, BootError> {
    for (field, value) in [("title", &metadata.title), ("version", &metadata.version)] {
        if value.trim().is_empty() {
            return Err(BootError::Application {
                message: format!("API {field} cannot be empty").into(),
                context: Some("metadata".into()),
            });
        }
    }

    Ok(OpenApiRouter::with_openapi(ApiDoc::openapi()).merge(app_router()))
}

/// Splits the registered routes from their description and mounts the docs next to them.
pub(crate) fn publish(app: OpenApiRouter, metadata: &ApiMetadata) -> (Router, ApiDescription) {
    let (routes, document) = app.split_for_parts();
    let docs = ApiDescription::build(metadata, document);
    let router = routes.merge(docs.router()).layer(TraceLayer::new_for_http());
    (router, docs)
}
