//! Precinct API - REST Layer
//!
//! Axum routes over the in-memory agent and case repositories from
//! `precinct-core`, with a uniform `{status, message, errors}` error envelope
//! and a generated OpenAPI document.

pub mod config;
pub mod constants;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

use precinct_core::{seed, AgentRepository, CaseRepository};
use rand::{rngs::StdRng, Rng, SeedableRng};

// Re-export commonly used types
pub use config::{ApiConfig, ConfigError, LogFormat};
pub use error::{ApiError, ApiResult, ErrorCode, ErrorDetails};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;

/// Build state populated with mock agents and cases.
///
/// A configured seed makes the generated data reproducible.
pub fn seed_state(config: &ApiConfig) -> AppState {
    match config.seed {
        Some(seed) => seed_with(config, &mut StdRng::seed_from_u64(seed)),
        None => seed_with(config, &mut rand::rng()),
    }
}

fn seed_with(config: &ApiConfig, rng: &mut impl Rng) -> AppState {
    let agents = seed::generate_agents(config.seed_agents, rng);
    let cases = seed::generate_cases(config.seed_cases, &agents, rng);
    tracing::info!(
        agents = agents.len(),
        cases = cases.len(),
        seeded = config.seed.is_some(),
        "Generated mock data"
    );

    AppState::new(
        AgentRepository::with_entities(agents),
        CaseRepository::with_entities(cases),
    )
}
