pub mod api;
pub mod config;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use config::Config;
use std::sync::Arc;
use std::time::Duration;
use study_hub_core::storage::TreeStore;
use study_hub_core::uploads::UploadService;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Full application: materials API, health check, CORS and request tracing.
pub fn app(config: &Config) -> anyhow::Result<Router> {
    let materials = Arc::new(TreeStore::new(config.materials_path())?);
    let uploads = Arc::new(UploadService::new(config.uploads_dir())?);
    Ok(Router::new()
        .merge(api::router(materials, uploads))
        .route("/health", get(|| async { "OK" }))
        .layer(cors_layer(config.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };
    let origins: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_DISPOSITION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}
