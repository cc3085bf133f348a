/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * - `TraceLayer` - one span per request
 * - `CorsLayer` - allows the configured frontend origin plus the local
 *   development origins
 *
 * # Fallback
 *
 * Unknown routes answer 404 with the standard JSON error body.
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::collab_routes::configure_collab_routes;
use crate::backend::server::state::AppState;

const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:8080"];

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();
    let router = configure_api_routes(router, &app_state);
    let router = configure_collab_routes(router);

    let cors = cors_layer(&app_state.config.frontend_url);

    router
        .fallback(|| async { BackendError::not_found("Route not found") })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in std::iter::once(frontend_url).chain(DEV_ORIGINS) {
        match origin.parse::<HeaderValue>() {
            Ok(value) if !origins.contains(&value) => origins.push(value),
            Ok(_) => {}
            Err(_) => tracing::warn!("Ignoring invalid CORS origin {:?}", origin),
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
