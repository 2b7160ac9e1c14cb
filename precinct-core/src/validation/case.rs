//! Case payload validation.
//!
//! `agentId` must reference an existing agent, so these validators take an
//! [`AgentLookup`] and resolve the reference before the rules run.

use serde::Deserialize;

use super::{validate_resource, FieldSpec, Presence, Rule, ValidationErrors, ValidationMode};
use crate::entities::{CaseDraft, CasePatch};
use crate::enums::{CaseStatus, EnumCodec};
use crate::error::StorageResult;
use crate::identity::{AgentId, EntityIdType};
use crate::repository::AgentRepository;

pub const TITLE_DISPLAY: &str = "Title";
pub const DESCRIPTION_DISPLAY: &str = "Description";
pub const STATUS_DISPLAY: &str = "Status";
pub const AGENT_ID_DISPLAY: &str = "Agent Id";

/// Existence check for agents referenced by cases.
pub trait AgentLookup {
    fn agent_exists(&self, id: &AgentId) -> StorageResult<bool>;
}

impl AgentLookup for AgentRepository {
    fn agent_exists(&self, id: &AgentId) -> StorageResult<bool> {
        self.contains(id)
    }
}

/// Raw case request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CasePayload {
    /// Must not be supplied.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub id: Presence,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "Theft"))]
    pub title: Presence,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "Stolen bike"))]
    pub description: Presence,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<CaseStatus>))]
    pub status: Presence,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub agent_id: Presence,
}

pub fn title_rules() -> Vec<Rule<'static>> {
    vec![
        Rule::is_string("Title must be a string"),
        Rule::trimmed_min(1, "Title cannot be empty"),
        Rule::trimmed_min(2, "Title must be at least 2 characters long"),
        Rule::trimmed_max(100, "Title cannot exceed 100 characters"),
    ]
}

pub fn description_rules() -> Vec<Rule<'static>> {
    vec![
        Rule::is_string("Description must be a string"),
        Rule::trimmed_min(1, "Description cannot be empty"),
        Rule::trimmed_min(2, "Description must be at least 2 characters long"),
    ]
}

pub fn status_rules() -> Vec<Rule<'static>> {
    vec![
        Rule::is_string("Status must be a string"),
        Rule::trimmed_min(1, "Status cannot be empty"),
        Rule::on_str(
            format!("Status is not valid. Valid status are: {}", CaseStatus::valid_names()),
            |s| CaseStatus::decode(s).is_some(),
        ),
    ]
}

/// `agentId` rules given whether the supplied id resolved to an agent.
pub fn agent_id_rules(agent_exists: bool) -> Vec<Rule<'static>> {
    vec![
        Rule::is_string("Agent Id must be a string"),
        Rule::new("Provided agent id is not a valid", move |_| agent_exists),
    ]
}

fn resolve_agent(payload: &CasePayload, agents: &impl AgentLookup) -> StorageResult<bool> {
    match payload.agent_id.as_str().and_then(AgentId::parse) {
        Some(id) => agents.agent_exists(&id),
        None => Ok(false),
    }
}

/// Validate a case payload under `mode`.
pub fn validate_case(
    payload: &CasePayload,
    agents: &impl AgentLookup,
    mode: ValidationMode,
) -> StorageResult<ValidationErrors> {
    let agent_exists = resolve_agent(payload, agents)?;
    let fields = [
        (
            FieldSpec {
                key: "title",
                display_name: TITLE_DISPLAY,
                rules: title_rules(),
            },
            &payload.title,
        ),
        (
            FieldSpec {
                key: "description",
                display_name: DESCRIPTION_DISPLAY,
                rules: description_rules(),
            },
            &payload.description,
        ),
        (
            FieldSpec {
                key: "status",
                display_name: STATUS_DISPLAY,
                rules: status_rules(),
            },
            &payload.status,
        ),
        (
            FieldSpec {
                key: "agentId",
                display_name: AGENT_ID_DISPLAY,
                rules: agent_id_rules(agent_exists),
            },
            &payload.agent_id,
        ),
    ];
    Ok(validate_resource(&payload.id, &fields, mode))
}

pub fn validate_create_case(
    payload: &CasePayload,
    agents: &impl AgentLookup,
) -> StorageResult<ValidationErrors> {
    validate_case(payload, agents, ValidationMode::Full)
}

pub fn validate_put_case(
    payload: &CasePayload,
    agents: &impl AgentLookup,
) -> StorageResult<ValidationErrors> {
    validate_case(payload, agents, ValidationMode::Full)
}

pub fn validate_patch_case(
    payload: &CasePayload,
    agents: &impl AgentLookup,
) -> StorageResult<ValidationErrors> {
    validate_case(payload, agents, ValidationMode::Partial)
}

impl CasePayload {
    /// Build a draft from a payload that passed full validation.
    pub fn to_draft(&self) -> Option<CaseDraft> {
        Some(CaseDraft {
            title: self.title.as_str()?.to_string(),
            description: self.description.as_str()?.to_string(),
            status: CaseStatus::decode(self.status.as_str()?)?,
            agent_id: AgentId::parse(self.agent_id.as_str()?)?,
        })
    }

    /// Collect the supplied fields of a payload that passed partial validation.
    pub fn to_patch(&self) -> CasePatch {
        CasePatch {
            title: self.title.as_str().map(str::to_string),
            description: self.description.as_str().map(str::to_string),
            status: self.status.as_str().and_then(CaseStatus::decode),
            agent_id: self.agent_id.as_str().and_then(AgentId::parse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AgentDraft;
    use crate::enums::AgentRole;
    use chrono::NaiveDate;
    use serde_json::json;

    fn agents_with_one() -> (AgentRepository, AgentId) {
        let repo = AgentRepository::new();
        let agent = repo
            .create(AgentDraft {
                name: "Jane Doe".to_string(),
                role: AgentRole::Detective,
                incorporation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            })
            .unwrap();
        (repo, agent.id)
    }

    fn payload(value: serde_json::Value) -> CasePayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_create() {
        let (agents, agent_id) = agents_with_one();
        let p = payload(json!({
            "title": "Theft",
            "description": "Stolen bike",
            "status": "Open",
            "agentId": agent_id.to_string(),
        }));
        assert!(validate_create_case(&p, &agents).unwrap().is_empty());
        let draft = p.to_draft().unwrap();
        assert_eq!(draft.agent_id, agent_id);
        assert_eq!(draft.status, CaseStatus::Open);
    }

    #[test]
    fn test_unknown_agent_id() {
        let (agents, _) = agents_with_one();
        for agent_id in [json!(AgentId::generate().to_string()), json!("not-a-uuid")] {
            let p = payload(json!({
                "title": "Theft",
                "description": "Stolen bike",
                "status": "Open",
                "agentId": agent_id,
            }));
            let errors = validate_create_case(&p, &agents).unwrap();
            assert_eq!(errors.get("agentId"), Some("Provided agent id is not a valid"));
        }
    }

    #[test]
    fn test_non_canonical_agent_id_does_not_resolve() {
        let (agents, agent_id) = agents_with_one();
        let uuid = agent_id.as_uuid();
        for alias in [uuid.simple().to_string(), uuid.urn().to_string()] {
            let p = payload(json!({
                "title": "Theft",
                "description": "Stolen bike",
                "status": "Open",
                "agentId": alias,
            }));
            let errors = validate_create_case(&p, &agents).unwrap();
            assert_eq!(errors.get("agentId"), Some("Provided agent id is not a valid"));
            assert!(p.to_draft().is_none());
        }
    }

    #[test]
    fn test_non_string_agent_id() {
        let (agents, _) = agents_with_one();
        let p = payload(json!({ "agentId": 12 }));
        let errors = validate_patch_case(&p, &agents).unwrap();
        assert_eq!(errors.get("agentId"), Some("Agent Id must be a string"));
    }

    #[test]
    fn test_status_rules() {
        let (agents, _) = agents_with_one();
        let errors = validate_patch_case(&payload(json!({ "status": "Closed" })), &agents).unwrap();
        assert_eq!(
            errors.get("status"),
            Some("Status is not valid. Valid status are: Open, Solved")
        );
    }

    #[test]
    fn test_description_has_no_upper_bound() {
        let (agents, _) = agents_with_one();
        let p = payload(json!({ "description": "x".repeat(5000) }));
        assert!(validate_patch_case(&p, &agents).unwrap().is_empty());
    }

    #[test]
    fn test_patch_empty_body() {
        let (agents, _) = agents_with_one();
        let errors = validate_patch_case(&payload(json!({})), &agents).unwrap();
        assert_eq!(
            errors.get("body"),
            Some("At least one field (title, description, status, agent id) must be provided for update")
        );
    }

    #[test]
    fn test_patch_title_maps_to_title() {
        let p = payload(json!({ "title": "Grand theft" }));
        let patch = p.to_patch();
        assert_eq!(patch.title.as_deref(), Some("Grand theft"));
        assert_eq!(patch.description, None);
    }
}
