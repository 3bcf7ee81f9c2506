//! API description publisher.
//!
//! Takes the `OpenAPI` fragment collected from explicit route registration, stamps the
//! static service metadata on it and serves the result twice: as an interactive reference
//! at [`DOCS_PATH`] and as raw JSON at [`DOCS_JSON_PATH`].

use axum::routing::get;
use axum::{Json, Router};
use bcore_domain::config::ApiMetadata;
use bcore_domain::constants::{DOCS_JSON_PATH, DOCS_PATH};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::openapi::{OpenApi, PathItem};
use utoipa_scalar::{Scalar, Servable};

/// One documented `METHOD path` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Endpoint {
    pub method: &'static str,
    pub path: String,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// The immutable API description document, built once at startup.
#[derive(Clone)]
pub struct ApiDescription {
    document: Arc<OpenApi>,
}

impl fmt::Debug for ApiDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiDescription")
            .field("title", &self.document.info.title)
            .field("version", &self.document.info.version)
            .field("endpoints", &self.document.paths.paths.len())
            .finish()
    }
}

impl ApiDescription {
    /// Stamps `metadata` onto the registered `routes` document.
    ///
    /// An empty route set is not an error: the document is still published and a warning
    /// is logged.
    #[must_use]
    pub fn build(metadata: &ApiMetadata, mut routes: OpenApi) -> Self {
        routes.info.title.clone_from(&metadata.title);
        routes.info.version.clone_from(&metadata.version);
        routes.info.description = Some(metadata.description.clone());

        let description = Self { document: Arc::new(routes) };
        let endpoints = description.endpoints();

        if endpoints.is_empty() {
            warn!(title = %metadata.title, "API description has no registered endpoints");
        } else {
            debug!(
                title = %metadata.title,
                version = %metadata.version,
                endpoints = endpoints.len(),
                "API description built"
            );
        }

        description
    }

    #[must_use]
    pub fn document(&self) -> &OpenApi {
        &self.document
    }

    /// Endpoint list derived from the registered routes, sorted by path then method.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let mut endpoints: Vec<Endpoint> = self
            .document
            .paths
            .paths
            .iter()
            .flat_map(|(path, item)| {
                operations(item).map(|method| Endpoint { method, path: path.clone() })
            })
            .collect();
        endpoints.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.cmp(b.method)));
        endpoints
    }

    /// Pretty-printed JSON form of the document.
    ///
    /// # Errors
    /// Returns an error if the document cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.document.as_ref())
    }

    /// Routes serving the interactive reference and the raw document.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let document = Arc::clone(&self.document);
        let raw = Router::new().route(
            DOCS_JSON_PATH,
            get(move || {
                let document = Arc::clone(&document);
                async move { Json(document) }
            }),
        );

        Router::new().merge(Scalar::with_url(DOCS_PATH, self.document.as_ref().clone())).merge(raw)
    }
}

fn operations(item: &PathItem) -> impl Iterator<Item = &'static str> {
    [
        ("GET", item.get.is_some()),
        ("PUT", item.put.is_some()),
        ("POST", item.post.is_some()),
        ("DELETE", item.delete.is_some()),
        ("OPTIONS", item.options.is_some()),
        ("HEAD", item.head.is_some()),
        ("PATCH", item.patch.is_some()),
        ("TRACE", item.trace.is_some()),
    ]
    .into_iter()
    .filter_map(|(method, present)| present.then_some(method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::router::app_router;

    fn description() -> ApiDescription {
        let (_, routes) = app_router::<()>().split_for_parts();
        ApiDescription::build(&ApiMetadata::default(), routes)
    }

    #[test]
    fn metadata_is_stamped_on_the_document() {
        let meta = ApiMetadata::new("Core", "Core service", "2.1");
        let (_, routes) = app_router::<()>().split_for_parts();
        let doc = ApiDescription::build(&meta, routes);

        let info = &doc.document().info;
        assert_eq!(info.title, "Core");
        assert_eq!(info.version, "2.1");
        assert_eq!(info.description.as_deref(), Some("Core service"));
    }

    #[test]
    fn health_endpoint_is_the_only_documented_route() {
        let endpoints = description().endpoints();
        assert_eq!(endpoints, vec![Endpoint { method: "GET", path: "/".to_owned() }]);
        assert_eq!(endpoints[0].to_string(), "GET /");
    }

    #[test]
    fn empty_route_set_is_still_published() {
        let doc = ApiDescription::build(&ApiMetadata::default(), OpenApi::default());
        assert!(doc.endpoints().is_empty());
        assert_eq!(doc.document().info.title, "App API");
    }

    #[test]
    fn debug_output_summarizes_the_document() {
        let rendered = format!("{:?}", description());
        assert!(rendered.starts_with("ApiDescription"), "{rendered}");
        assert!(rendered.contains("title: \"App API\""), "{rendered}");
        assert!(rendered.contains("endpoints: 1"), "{rendered}");
    }

    #[test]
    fn json_form_contains_metadata_and_paths() {
        let json: serde_json::Value =
            serde_json::from_str(&description().to_json().expect("serialize")).expect("parse");
        assert_eq!(json["info"]["title"], "App API");
        assert_eq!(json["info"]["version"], "1.0");
        assert!(json["paths"]["/"]["get"].is_object());
    }
}
