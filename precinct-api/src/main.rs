//! Precinct API Server Entry Point
//!
//! Loads configuration, seeds the repositories with mock data and starts the
//! Axum HTTP server.

use axum::Router;
use precinct_api::{
    create_api_router, seed_state, telemetry::init_tracing, ApiConfig, ApiError, ApiResult,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let api_config = ApiConfig::from_env()
        .map_err(|e| ApiError::internal_error(format!("Invalid configuration: {}", e)))?;
    init_tracing(api_config.log_format)?;

    let state = seed_state(&api_config);
    let app: Router = create_api_router(state, &api_config);

    let addr = api_config
        .bind_addr()
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    tracing::info!(%addr, "Starting Precinct API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
