//! Case REST API Routes
//!
//! Cases reference their responsible agent by id. The reference is checked
//! when a case is written; reading it back through `/cases/{id}/agent` treats
//! a reference that no longer resolves as a server-side fault.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use precinct_core::{
    validate_create_case, validate_field, validate_patch_case, validate_put_case,
    validation::case::{status_rules, STATUS_DISPLAY},
    Agent, Case, CaseId, CasePayload, CaseStatus, EntityIdType, EnumCodec, RepositoryOutcome,
    AgentId,
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

/// Query parameters for listing cases.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListCasesQuery {
    /// Only cases assigned to this agent
    pub agent_id: Option<String>,
    /// Only cases with this status (Open, Solved)
    pub status: Option<String>,
}

/// Query parameters for searching cases.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchCasesQuery {
    /// Case-sensitive text matched against title and description
    pub q: Option<String>,
}

fn parse_status_filter(raw: &str) -> ApiResult<CaseStatus> {
    let value = Value::String(raw.to_string());
    if let Some(message) = validate_field(Some(&value), &status_rules(), true, STATUS_DISPLAY) {
        return Err(ApiError::invalid_query(message));
    }
    CaseStatus::decode(raw).ok_or_else(|| {
        ApiError::invalid_query(format!(
            "Status is not valid. Valid status are: {}",
            CaseStatus::valid_names()
        ))
    })
}

/// Whether `query` occurs in the title or the description.
pub fn case_matches(case: &Case, query: &str) -> bool {
    case.title.contains(query) || case.description.contains(query)
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /cases - List cases, optionally filtered by agent and status
#[utoipa::path(
    get,
    path = "/cases",
    tag = "Cases",
    params(ListCasesQuery),
    responses(
        (status = 200, description = "List of cases", body = Vec<Case>),
        (status = 400, description = "Invalid status", body = ApiError),
        (status = 404, description = "Agent not found", body = ApiError),
    )
)]
pub async fn list_cases(
    State(state): State<AppState>,
    query: Result<Query<ListCasesQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = query?;

    let mut cases = match params.agent_id.as_deref() {
        Some(raw) => {
            let agent_id = match AgentId::parse(raw) {
                Some(id) if state.agents.contains(&id)? => id,
                _ => return Err(ApiError::unresolved_id("Agent", raw)),
            };
            state.cases.find_by_agent(&agent_id)?
        }
        None => state.cases.find_all()?,
    };

    if let Some(raw) = params.status.as_deref() {
        let status = parse_status_filter(raw)?;
        cases.retain(|case| case.status == status);
    }

    Ok(Json(cases))
}

/// GET /cases/search - Substring search over title and description
#[utoipa::path(
    get,
    path = "/cases/search",
    tag = "Cases",
    params(SearchCasesQuery),
    responses(
        (status = 200, description = "Cases matching the query", body = Vec<Case>),
        (status = 400, description = "Missing or empty query", body = ApiError),
    )
)]
pub async fn search_cases(
    State(state): State<AppState>,
    query: Result<Query<SearchCasesQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = query?;
    let q = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::invalid_query("Invalid query parameter 'q'"))?;

    let mut cases = state.cases.find_all()?;
    cases.retain(|case| case_matches(case, &q));

    Ok(Json(cases))
}

/// GET /cases/{id} - Get case by ID
#[utoipa::path(
    get,
    path = "/cases/{id}",
    tag = "Cases",
    params(
        ("id" = uuid::Uuid, Path, description = "Case ID")
    ),
    responses(
        (status = 200, description = "Case details", body = Case),
        (status = 400, description = "Malformed case ID", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
    )
)]
pub async fn get_case(
    State(state): State<AppState>,
    PathId(id): PathId<CaseId>,
) -> ApiResult<impl IntoResponse> {
    let case = state
        .cases
        .find_by_id(&id)?
        .ok_or_else(|| ApiError::unresolved_id("Case", id))?;

    Ok(Json(case))
}

/// GET /cases/{id}/agent - Get the agent responsible for a case
#[utoipa::path(
    get,
    path = "/cases/{id}/agent",
    tag = "Cases",
    params(
        ("id" = uuid::Uuid, Path, description = "Case ID")
    ),
    responses(
        (status = 200, description = "Responsible agent", body = Agent),
        (status = 400, description = "Malformed case ID", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
        (status = 500, description = "Case references an agent that no longer exists", body = ApiError),
    )
)]
pub async fn get_case_agent(
    State(state): State<AppState>,
    PathId(id): PathId<CaseId>,
) -> ApiResult<impl IntoResponse> {
    let case = state
        .cases
        .find_by_id(&id)?
        .ok_or_else(|| ApiError::unresolved_id("Case", id))?;

    match state.agents.find_by_id(&case.agent_id)? {
        Some(agent) => Ok(Json(agent)),
        None => {
            tracing::warn!(case_id = %id, agent_id = %case.agent_id, "Dangling agent reference");
            Err(ApiError::dangling_agent(id, case.agent_id))
        }
    }
}

/// POST /cases - Create a new case
#[utoipa::path(
    post,
    path = "/cases",
    tag = "Cases",
    request_body = CasePayload,
    responses(
        (status = 201, description = "Case created successfully", body = Case),
        (status = 400, description = "Validation errors", body = ApiError),
    )
)]
pub async fn create_case(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CasePayload>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate_create_case(&payload, state.agents.as_ref())?;
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    let draft = payload
        .to_draft()
        .ok_or_else(|| ApiError::internal_error("Validated case payload was incomplete"))?;
    let case = state.cases.create(draft)?;
    tracing::info!(case_id = %case.id, agent_id = %case.agent_id, "Case created");

    Ok((StatusCode::CREATED, Json(case)))
}

/// PUT /cases/{id} - Replace a case
#[utoipa::path(
    put,
    path = "/cases/{id}",
    tag = "Cases",
    params(
        ("id" = uuid::Uuid, Path, description = "Case ID")
    ),
    request_body = CasePayload,
    responses(
        (status = 200, description = "Case updated successfully", body = Case),
        (status = 400, description = "Validation errors", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
    )
)]
pub async fn put_case(
    State(state): State<AppState>,
    PathId(id): PathId<CaseId>,
    JsonBody(payload): JsonBody<CasePayload>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate_put_case(&payload, state.agents.as_ref())?;
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    if !state.cases.contains(&id)? {
        return Err(ApiError::not_found("Case", id));
    }

    let draft = payload
        .to_draft()
        .ok_or_else(|| ApiError::internal_error("Validated case payload was incomplete"))?;
    write_case(&state, draft.into_case(id))
}

/// PATCH /cases/{id} - Partially update a case
#[utoipa::path(
    patch,
    path = "/cases/{id}",
    tag = "Cases",
    params(
        ("id" = uuid::Uuid, Path, description = "Case ID")
    ),
    request_body = CasePayload,
    responses(
        (status = 200, description = "Case updated successfully", body = Case),
        (status = 400, description = "Validation errors", body = ApiError),
        (status = 404, description = "Case not found", body = ApiError),
    )
)]
pub async fn patch_case(
    State(state): State<AppState>,
    PathId(id): PathId<CaseId>,
    JsonBody(payload): JsonBody<CasePayload>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate_patch_case(&payload, state.agents.as_ref())?;
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    let existing = state
        .cases
        .find_by_id(&id)?
        .ok_or_else(|| ApiError::not_found("Case", id))?;

    write_case(&state, payload.to_patch().apply(&existing))
}

fn write_case(state: &AppState, case: Case) -> ApiResult<Json<Case>> {
    match state.cases.update(case.clone())? {
        RepositoryOutcome::Success => Ok(Json(case)),
        _ => Err(ApiError::not_found("Case", case.id)),
    }
}

/// DELETE /cases/{id} - Delete a case
#[utoipa::path(
    delete,
    path = "/cases/{id}",
    tag = "Cases",
    params(
        ("id" = uuid::Uuid, Path, description = "Case ID")
    ),
    responses(
        (status = 204, description = "Case deleted successfully"),
        (status = 400, description = "Malformed case ID", body = ApiError),
        (status = 404, description = "Case not found or failed to delete", body = ApiError),
    )
)]
pub async fn delete_case(
    State(state): State<AppState>,
    PathId(id): PathId<CaseId>,
) -> ApiResult<impl IntoResponse> {
    match state.cases.delete_by_id(&id)? {
        RepositoryOutcome::Success => Ok(StatusCode::NO_CONTENT),
        RepositoryOutcome::Failed => Err(ApiError::delete_failed("case", id)),
        RepositoryOutcome::NotFound => Err(ApiError::not_found("Case", id)),
    }
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the case routes router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/cases", get(list_cases).post(create_case))
        .route("/cases/search", get(search_cases))
        .route(
            "/cases/:id",
            get(get_case)
                .put(put_case)
                .patch(patch_case)
                .delete(delete_case),
        )
        .route("/cases/:id/agent", get(get_case_agent))
        .with_state(state)
}
