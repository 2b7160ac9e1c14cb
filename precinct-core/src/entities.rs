//! Agent and Case entities.
//!
//! Entities only exist in validated form. Request bodies are parsed into
//! drafts (full field sets, used by create and replace) or patches (partial
//! field sets, merged into an existing entity) by the validation module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{AgentRole, CaseStatus};
use crate::identity::{AgentId, CaseId, EntityIdType};

/// Wire format of calendar dates.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Anything a [`Repository`](crate::repository::Repository) can store.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Typed identifier of this entity.
    type Id: EntityIdType;

    /// The entity's identifier. Immutable after creation.
    fn entity_id(&self) -> Self::Id;
}

// ============================================================================
// AGENT
// ============================================================================

/// A member of department personnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    #[cfg_attr(feature = "openapi", schema(example = "Jane Doe"))]
    pub name: String,
    pub role: AgentRole,
    #[serde(with = "slash_date")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024/01/15"))]
    pub incorporation_date: NaiveDate,
}

impl Entity for Agent {
    type Id = AgentId;

    fn entity_id(&self) -> AgentId {
        self.id
    }
}

/// Every field of an agent except its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDraft {
    pub name: String,
    pub role: AgentRole,
    pub incorporation_date: NaiveDate,
}

impl AgentDraft {
    /// Materialize the draft under the given id.
    pub fn into_agent(self, id: AgentId) -> Agent {
        Agent {
            id,
            name: self.name,
            role: self.role,
            incorporation_date: self.incorporation_date,
        }
    }
}

/// Fields supplied by a partial agent update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPatch {
    pub name: Option<String>,
    pub role: Option<AgentRole>,
    pub incorporation_date: Option<NaiveDate>,
}

impl AgentPatch {
    /// Merge the supplied fields over `agent`, keeping its id.
    pub fn apply(self, agent: &Agent) -> Agent {
        Agent {
            id: agent.id,
            name: self.name.unwrap_or_else(|| agent.name.clone()),
            role: self.role.unwrap_or(agent.role),
            incorporation_date: self.incorporation_date.unwrap_or(agent.incorporation_date),
        }
    }
}

// ============================================================================
// CASE
// ============================================================================

/// An incident assigned to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: CaseId,
    #[cfg_attr(feature = "openapi", schema(example = "Burglary Investigation"))]
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    /// Agent responsible for the case. Not guaranteed to still exist.
    pub agent_id: AgentId,
}

impl Entity for Case {
    type Id = CaseId;

    fn entity_id(&self) -> CaseId {
        self.id
    }
}

/// Every field of a case except its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDraft {
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    pub agent_id: AgentId,
}

impl CaseDraft {
    pub fn into_case(self, id: CaseId) -> Case {
        Case {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            agent_id: self.agent_id,
        }
    }
}

/// Fields supplied by a partial case update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CasePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
    pub agent_id: Option<AgentId>,
}

impl CasePatch {
    pub fn apply(self, case: &Case) -> Case {
        Case {
            id: case.id,
            title: self.title.unwrap_or_else(|| case.title.clone()),
            description: self.description.unwrap_or_else(|| case.description.clone()),
            status: self.status.unwrap_or(case.status),
            agent_id: self.agent_id.unwrap_or(case.agent_id),
        }
    }
}

/// Serde adapter for `YYYY/MM/DD` dates.
pub mod slash_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_agent() -> Agent {
        AgentDraft {
            name: "Jane Doe".to_string(),
            role: AgentRole::Detective,
            incorporation_date: date(2024, 1, 15),
        }
        .into_agent(AgentId::generate())
    }

    #[test]
    fn test_agent_serializes_symbolic_role_and_slash_date() {
        let agent = sample_agent();
        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["role"], json!("Detective"));
        assert_eq!(json["incorporationDate"], json!("2024/01/15"));
        assert_eq!(json["id"], json!(agent.id.to_string()));
    }

    #[test]
    fn test_case_serializes_camel_case_agent_id() {
        let agent = sample_agent();
        let case = CaseDraft {
            title: "Theft".to_string(),
            description: "Stolen bike".to_string(),
            status: CaseStatus::Open,
            agent_id: agent.id,
        }
        .into_case(CaseId::generate());
        let json = serde_json::to_value(&case).unwrap();
        assert_eq!(json["agentId"], json!(agent.id.to_string()));
        assert_eq!(json["status"], json!("Open"));
    }

    #[test]
    fn test_agent_patch_keeps_unsupplied_fields() {
        let agent = sample_agent();
        let patched = AgentPatch {
            role: Some(AgentRole::Captain),
            ..Default::default()
        }
        .apply(&agent);

        assert_eq!(patched.id, agent.id);
        assert_eq!(patched.name, agent.name);
        assert_eq!(patched.role, AgentRole::Captain);
        assert_eq!(patched.incorporation_date, agent.incorporation_date);
    }

    #[test]
    fn test_case_patch_updates_title() {
        let case = CaseDraft {
            title: "Theft".to_string(),
            description: "Stolen bike".to_string(),
            status: CaseStatus::Open,
            agent_id: AgentId::generate(),
        }
        .into_case(CaseId::generate());
        let patched = CasePatch {
            title: Some("Grand theft".to_string()),
            ..Default::default()
        }
        .apply(&case);

        assert_eq!(patched.title, "Grand theft");
        assert_eq!(patched.description, case.description);
    }
}
