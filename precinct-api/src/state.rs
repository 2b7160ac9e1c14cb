//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use precinct_core::{AgentRepository, CaseRepository};

/// Repositories shared by every route, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub agents: Arc<AgentRepository>,
    pub cases: Arc<CaseRepository>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(agents: AgentRepository, cases: CaseRepository) -> Self {
        Self {
            agents: Arc::new(agents),
            cases: Arc::new(cases),
            start_time: Instant::now(),
        }
    }

    /// State with two empty repositories.
    pub fn empty() -> Self {
        Self::new(AgentRepository::new(), CaseRepository::new())
    }
}
