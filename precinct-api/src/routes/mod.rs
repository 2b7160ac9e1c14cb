//! REST API Routes Module
//!
//! Route handlers organized by resource:
//! - `/agents` CRUD with role filter and incorporation date sorting
//! - `/cases` CRUD with agent/status filters, text search and agent lookup
//! - `/health` liveness
//! - `/openapi.json` generated API document
//!
//! Every resource router uses full paths so the merged router matches the
//! paths published in the OpenAPI document.

pub mod agent;
pub mod case;
pub mod health;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::{ApiError, ErrorCode};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Unknown paths get the error envelope instead of an empty body.
async fn fallback(uri: Uri) -> ApiError {
    ApiError::new(ErrorCode::EntityNotFound, format!("Route {} not found", uri.path()))
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// Empty origins allow any origin. Otherwise only the configured origins are
/// allowed; entries that are not valid header values are skipped.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// # Middleware Order (outer to inner)
/// 1. Tracing - one span per request
/// 2. CORS - handles preflight requests
pub fn create_api_router(state: AppState, api_config: &ApiConfig) -> Router {
    Router::new()
        .merge(agent::create_router(state.clone()))
        .merge(case::create_router(state.clone()))
        .merge(health::create_router(state))
        .route("/openapi.json", get(openapi_json))
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(api_config)),
        )
}
