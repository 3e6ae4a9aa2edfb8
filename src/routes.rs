//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check of the storage backend
//! - `/api/v1/*`      - Place REST API
//! - anything else    - 404 JSON error
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slashes are ignored

use crate::api;
use crate::api::handlers::{health_handler, not_found_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api::routes::place_routes())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
