//! pail-server: HTTP layer for the pail bucket file manager
//!
//! This module exports the router assembly and handler modules for use in
//! integration tests.

pub mod api;
pub mod auth;
pub mod error;

use std::path::Path;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use pail_core::ServerConfig;

/// Assemble the full application: API under `/api` plus the static SPA.
///
/// CORS is only attached outside production (`PROD=1`); in production the
/// server serves the front-end itself and cross-origin requests are not
/// expected.
pub fn build_router(config: &ServerConfig) -> Router {
    let dist = Path::new(&config.dist_dir);

    let mut router = Router::new()
        .nest("/api", api::router())
        .route_service("/", ServeFile::new(dist.join("index.html")))
        .route_service("/icon.svg", ServeFile::new(dist.join("icon.svg")))
        .nest_service("/static", ServeDir::new(dist.join("static")));

    if std::env::var("PROD").as_deref() != Ok("1") {
        router = router.layer(dev_cors(&config.cors_allow_origins));
    }

    router
}

fn dev_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("key"),
            HeaderName::from_static("secret"),
            HeaderName::from_static("endpoint"),
            HeaderName::from_static("bucket"),
        ])
        .allow_credentials(true)
}
