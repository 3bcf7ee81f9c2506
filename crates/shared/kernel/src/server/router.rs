use super::health;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Registers the application endpoints together with their `OpenAPI` descriptors.
pub fn app_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    OpenApiRouter::<S>::new().routes(routes!(health::hello_handler))
}
