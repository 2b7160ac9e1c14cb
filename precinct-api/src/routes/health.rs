//! Health Check Endpoint
//!
//! Liveness plus a snapshot of repository sizes. No request data is read.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, state::AppState};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[cfg_attr(feature = "openapi", schema(example = "ok"))]
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Agents currently stored
    pub agents: usize,
    /// Cases currently stored
    pub cases: usize,
}

/// GET /health - Liveness and repository sizes
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
        (status = 500, description = "Storage unavailable", body = crate::error::ApiError),
    )
)]
pub async fn health(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        agents: state.agents.len()?,
        cases: state.cases.len()?,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}
