//! Agent REST API Routes
//!
//! Handlers validate the raw payload first, then resolve the id, then write
//! through the agent repository.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use precinct_core::{
    validate_create_agent, validate_field, validate_patch_agent, validate_put_agent,
    validation::agent::{role_rules, ROLE_DISPLAY},
    Agent, AgentId, AgentPayload, AgentRole, AgentSort, EnumCodec, RepositoryOutcome,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::{
    error::{ApiError, ApiResult},
    extractors::{JsonBody, PathId},
    state::AppState,
};

// ============================================================================
// QUERY TYPES
// ============================================================================

/// Query parameters for listing agents.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAgentsQuery {
    /// Only agents with this role (Officer, Detective, Captain, Chief)
    pub role: Option<String>,
    /// `incorporationDate` (ascending) or `-incorporationDate` (descending)
    pub sort: Option<String>,
}

fn parse_role_filter(raw: &str) -> ApiResult<AgentRole> {
    let value = Value::String(raw.to_string());
    if let Some(message) = validate_field(Some(&value), &role_rules(), true, ROLE_DISPLAY) {
        return Err(ApiError::invalid_query(message));
    }
    AgentRole::decode(raw).ok_or_else(|| {
        ApiError::invalid_query(format!(
            "Role is not valid. Valid roles are: {}",
            AgentRole::valid_names()
        ))
    })
}

fn parse_sort(raw: &str) -> ApiResult<AgentSort> {
    AgentSort::decode(raw).ok_or_else(|| {
        ApiError::invalid_query(format!(
            "'{}' is not a valid sort string, Valid strings are: {}",
            raw,
            AgentSort::valid_names()
        ))
    })
}

/// Stable sort by incorporation date in the requested direction.
pub fn sort_agents(agents: &mut [Agent], sort: AgentSort) {
    if sort.is_descending() {
        agents.sort_by(|a, b| b.incorporation_date.cmp(&a.incorporation_date));
    } else {
        agents.sort_by(|a, b| a.incorporation_date.cmp(&b.incorporation_date));
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /agents - List agents, optionally filtered by role and sorted
#[utoipa::path(
    get,
    path = "/agents",
    tag = "Agents",
    params(ListAgentsQuery),
    responses(
        (status = 200, description = "List of agents", body = Vec<Agent>),
        (status = 400, description = "Invalid role or sort string", body = ApiError),
    )
)]
pub async fn list_agents(
    State(state): State<AppState>,
    query: Result<Query<ListAgentsQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = query?;
    let role = params.role.as_deref().map(parse_role_filter).transpose()?;
    let sort = params.sort.as_deref().map(parse_sort).transpose()?;

    let mut agents = state.agents.find_all()?;
    if let Some(role) = role {
        agents.retain(|agent| agent.role == role);
    }
    if let Some(sort) = sort {
        sort_agents(&mut agents, sort);
    }

    Ok(Json(agents))
}

/// GET /agents/{id} - Get agent by ID
#[utoipa::path(
    get,
    path = "/agents/{id}",
    tag = "Agents",
    params(
        ("id" = uuid::Uuid, Path, description = "Agent ID")
    ),
    responses(
        (status = 200, description = "Agent details", body = Agent),
        (status = 400, description = "Malformed agent ID", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    )
)]
pub async fn get_agent(
    State(state): State<AppState>,
    PathId(id): PathId<AgentId>,
) -> ApiResult<impl IntoResponse> {
    let agent = state
        .agents
        .find_by_id(&id)?
        .ok_or_else(|| ApiError::not_found("Agent", id))?;

    Ok(Json(agent))
}

/// POST /agents - Create a new agent
#[utoipa::path(
    post,
    path = "/agents",
    tag = "Agents",
    request_body = AgentPayload,
    responses(
        (status = 201, description = "Agent created successfully", body = Agent),
        (status = 400, description = "Validation errors", body = ApiError),
    )
)]
pub async fn create_agent(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AgentPayload>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate_create_agent(&payload);
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    let draft = payload
        .to_draft()
        .ok_or_else(|| ApiError::internal_error("Validated agent payload was incomplete"))?;
    let agent = state.agents.create(draft)?;
    tracing::info!(agent_id = %agent.id, role = %agent.role, "Agent created");

    Ok((StatusCode::CREATED, Json(agent)))
}

/// PUT /agents/{id} - Replace an agent
#[utoipa::path(
    put,
    path = "/agents/{id}",
    tag = "Agents",
    params(
        ("id" = uuid::Uuid, Path, description = "Agent ID")
    ),
    request_body = AgentPayload,
    responses(
        (status = 200, description = "Agent updated successfully", body = Agent),
        (status = 400, description = "Validation errors", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    )
)]
pub async fn put_agent(
    State(state): State<AppState>,
    PathId(id): PathId<AgentId>,
    JsonBody(payload): JsonBody<AgentPayload>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate_put_agent(&payload);
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    if !state.agents.contains(&id)? {
        return Err(ApiError::not_found("Agent", id));
    }

    let draft = payload
        .to_draft()
        .ok_or_else(|| ApiError::internal_error("Validated agent payload was incomplete"))?;
    let agent = draft.into_agent(id);
    write_agent(&state, agent)
}

/// PATCH /agents/{id} - Partially update an agent
#[utoipa::path(
    patch,
    path = "/agents/{id}",
    tag = "Agents",
    params(
        ("id" = uuid::Uuid, Path, description = "Agent ID")
    ),
    request_body = AgentPayload,
    responses(
        (status = 200, description = "Agent updated successfully", body = Agent),
        (status = 400, description = "Validation errors", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    )
)]
pub async fn patch_agent(
    State(state): State<AppState>,
    PathId(id): PathId<AgentId>,
    JsonBody(payload): JsonBody<AgentPayload>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate_patch_agent(&payload);
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    let existing = state
        .agents
        .find_by_id(&id)?
        .ok_or_else(|| ApiError::not_found("Agent", id))?;

    let agent = payload.to_patch().apply(&existing);
    write_agent(&state, agent)
}

fn write_agent(state: &AppState, agent: Agent) -> ApiResult<Json<Agent>> {
    match state.agents.update(agent.clone())? {
        RepositoryOutcome::Success => Ok(Json(agent)),
        _ => Err(ApiError::not_found("Agent", agent.id)),
    }
}

/// DELETE /agents/{id} - Delete an agent
///
/// Cases assigned to the agent keep their `agentId`.
#[utoipa::path(
    delete,
    path = "/agents/{id}",
    tag = "Agents",
    params(
        ("id" = uuid::Uuid, Path, description = "Agent ID")
    ),
    responses(
        (status = 204, description = "Agent deleted successfully"),
        (status = 400, description = "Malformed agent ID", body = ApiError),
        (status = 404, description = "Agent not found or failed to delete", body = ApiError),
    )
)]
pub async fn delete_agent(
    State(state): State<AppState>,
    PathId(id): PathId<AgentId>,
) -> ApiResult<impl IntoResponse> {
    match state.agents.delete_by_id(&id)? {
        RepositoryOutcome::Success => {
            let orphaned = state.cases.find_by_agent(&id)?.len();
            if orphaned > 0 {
                tracing::warn!(agent_id = %id, orphaned, "Deleted agent still owns cases");
            }
            Ok(StatusCode::NO_CONTENT)
        }
        RepositoryOutcome::Failed => Err(ApiError::delete_failed("agent", id)),
        RepositoryOutcome::NotFound => Err(ApiError::not_found("Agent", id)),
    }
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the agent routes router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/agents", get(list_agents).post(create_agent))
        .route(
            "/agents/:id",
            get(get_agent)
                .put(put_agent)
                .patch(patch_agent)
                .delete(delete_agent),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use precinct_core::{AgentDraft, EntityIdType};

    fn agent_on(y: i32, m: u32, d: u32) -> Agent {
        AgentDraft {
            name: format!("Agent {}", y),
            role: AgentRole::Officer,
            incorporation_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        }
        .into_agent(AgentId::generate())
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let agents = vec![agent_on(2015, 6, 1), agent_on(2008, 1, 1), agent_on(2020, 2, 2)];

        let mut ascending = agents.clone();
        sort_agents(&mut ascending, AgentSort::IncorporationDateAsc);
        let years: Vec<_> = ascending
            .iter()
            .map(|a| a.incorporation_date.format("%Y").to_string())
            .collect();
        assert_eq!(years, ["2008", "2015", "2020"]);

        let mut descending = agents;
        sort_agents(&mut descending, AgentSort::IncorporationDateDesc);
        let years: Vec<_> = descending
            .iter()
            .map(|a| a.incorporation_date.format("%Y").to_string())
            .collect();
        assert_eq!(years, ["2020", "2015", "2008"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let first = agent_on(2010, 3, 3);
        let second = agent_on(2010, 3, 3);
        let mut agents = vec![first.clone(), second.clone()];

        sort_agents(&mut agents, AgentSort::IncorporationDateDesc);
        assert_eq!(agents[0].id, first.id);
        assert_eq!(agents[1].id, second.id);
    }

    #[test]
    fn test_parse_sort_rejects_unknown() {
        let err = parse_sort("name").unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(
            err.errors,
            crate::error::ErrorDetails::List(vec![
                "'name' is not a valid sort string, Valid strings are: incorporationDate, -incorporationDate"
                    .to_string()
            ])
        );
    }

    #[test]
    fn test_parse_role_filter() {
        assert_eq!(parse_role_filter("Chief").unwrap(), AgentRole::Chief);
        assert!(parse_role_filter("chief").is_err());
        assert!(parse_role_filter("").is_err());
    }
}
