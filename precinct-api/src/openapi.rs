//! OpenAPI Specification for Precinct API
//!
//! Generated from route annotations and the schema derives on the domain
//! types. Served at `/openapi.json` and printed by the `generate-openapi` bin.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{agent, case, health};

use precinct_core::{Agent, AgentId, AgentPayload, AgentRole, Case, CaseId, CasePayload, CaseStatus};

/// OpenAPI document for Precinct API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Precinct API",
        version = "0.1.0",
        description = "In-memory REST API for police department agents and the cases assigned to them",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Agents", description = "Department agents with role and incorporation date"),
        (name = "Cases", description = "Cases and their responsible agent"),
        (name = "Health", description = "Liveness")
    ),
    paths(
        // Agents
        agent::list_agents,
        agent::get_agent,
        agent::create_agent,
        agent::put_agent,
        agent::patch_agent,
        agent::delete_agent,
        // Cases
        case::list_cases,
        case::search_cases,
        case::get_case,
        case::get_case_agent,
        case::create_case,
        case::put_case,
        case::patch_case,
        case::delete_case,
        // Health
        health::health,
    ),
    components(schemas(
        Agent,
        AgentId,
        AgentRole,
        AgentPayload,
        Case,
        CaseId,
        CaseStatus,
        CasePayload,
        ApiError,
        ErrorCode,
        health::HealthResponse,
    ))
)]
pub struct ApiDoc;
