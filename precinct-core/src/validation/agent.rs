//! Agent payload validation.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{validate_resource, FieldSpec, Presence, Rule, ValidationErrors, ValidationMode};
use crate::entities::{AgentDraft, AgentPatch, DATE_FORMAT};
use crate::enums::{AgentRole, EnumCodec};

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}/\d{2}/\d{2}$").expect("Invalid date regex"));

pub const NAME_DISPLAY: &str = "Name";
pub const ROLE_DISPLAY: &str = "Role";
pub const INCORPORATION_DATE_DISPLAY: &str = "Incorporation Date";

/// Raw agent request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AgentPayload {
    /// Must not be supplied.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub id: Presence,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "Jane Doe"))]
    pub name: Presence,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<AgentRole>))]
    pub role: Presence,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "2024/01/15"))]
    pub incorporation_date: Presence,
}

pub fn name_rules() -> Vec<Rule<'static>> {
    vec![
        Rule::is_string("Name must be a string"),
        Rule::trimmed_min(1, "Name cannot be empty"),
        Rule::trimmed_min(2, "Name must be at least 2 characters long"),
        Rule::trimmed_max(100, "Name cannot exceed 100 characters"),
    ]
}

pub fn role_rules() -> Vec<Rule<'static>> {
    vec![
        Rule::is_string("Role must be a string"),
        Rule::trimmed_min(1, "Role cannot be empty"),
        Rule::on_str(
            format!("Role is not valid. Valid roles are: {}", AgentRole::valid_names()),
            |s| AgentRole::decode(s).is_some(),
        ),
    ]
}

pub fn incorporation_date_rules() -> Vec<Rule<'static>> {
    vec![
        Rule::is_string("Incorporation date must be a string"),
        Rule::on_str(
            "Incorporation date must follow the 'YYYY/MM/DD' format",
            |s| DATE_PATTERN.is_match(s),
        ),
        Rule::on_str("Incorporation date must be a valid date", |s| {
            parse_date(s).is_some()
        }),
    ]
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn field_specs() -> [FieldSpec<'static>; 3] {
    [
        FieldSpec {
            key: "name",
            display_name: NAME_DISPLAY,
            rules: name_rules(),
        },
        FieldSpec {
            key: "role",
            display_name: ROLE_DISPLAY,
            rules: role_rules(),
        },
        FieldSpec {
            key: "incorporationDate",
            display_name: INCORPORATION_DATE_DISPLAY,
            rules: incorporation_date_rules(),
        },
    ]
}

/// Validate an agent payload under `mode`.
pub fn validate_agent(payload: &AgentPayload, mode: ValidationMode) -> ValidationErrors {
    let [name, role, date] = field_specs();
    let fields = [
        (name, &payload.name),
        (role, &payload.role),
        (date, &payload.incorporation_date),
    ];
    validate_resource(&payload.id, &fields, mode)
}

pub fn validate_create_agent(payload: &AgentPayload) -> ValidationErrors {
    validate_agent(payload, ValidationMode::Full)
}

pub fn validate_put_agent(payload: &AgentPayload) -> ValidationErrors {
    validate_agent(payload, ValidationMode::Full)
}

pub fn validate_patch_agent(payload: &AgentPayload) -> ValidationErrors {
    validate_agent(payload, ValidationMode::Partial)
}

impl AgentPayload {
    /// Build a draft from a payload that passed full validation.
    ///
    /// Returns `None` if any field is missing or malformed.
    pub fn to_draft(&self) -> Option<AgentDraft> {
        Some(AgentDraft {
            name: self.name.as_str()?.to_string(),
            role: AgentRole::decode(self.role.as_str()?)?,
            incorporation_date: parse_date(self.incorporation_date.as_str()?)?,
        })
    }

    /// Collect the supplied fields of a payload that passed partial validation.
    pub fn to_patch(&self) -> AgentPatch {
        AgentPatch {
            name: self.name.as_str().map(str::to_string),
            role: self.role.as_str().and_then(AgentRole::decode),
            incorporation_date: self.incorporation_date.as_str().and_then(parse_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> AgentPayload {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> serde_json::Value {
        json!({ "name": "Jane Doe", "role": "Detective", "incorporationDate": "2024/01/15" })
    }

    #[test]
    fn test_valid_create() {
        let p = payload(valid());
        assert!(validate_create_agent(&p).is_empty());
        let draft = p.to_draft().unwrap();
        assert_eq!(draft.role, AgentRole::Detective);
        assert_eq!(draft.name, "Jane Doe");
    }

    #[test]
    fn test_create_requires_every_field() {
        let errors = validate_create_agent(&payload(json!({})));
        assert_eq!(errors.get("name"), Some("Name field is required"));
        assert_eq!(errors.get("role"), Some("Role field is required"));
        assert_eq!(
            errors.get("incorporationDate"),
            Some("Incorporation Date field is required")
        );
        assert!(!errors.contains("body"));
    }

    #[test]
    fn test_id_is_rejected() {
        let mut body = valid();
        body["id"] = json!("abc");
        let errors = validate_put_agent(&payload(body));
        assert_eq!(errors.get("id"), Some(super::super::ID_NOT_ALLOWED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_name_rules() {
        let cases = [
            (json!(5), "Name must be a string"),
            (json!("   "), "Name cannot be empty"),
            (json!(" J "), "Name must be at least 2 characters long"),
            (json!("x".repeat(101)), "Name cannot exceed 100 characters"),
        ];
        for (name, expected) in cases {
            let mut body = valid();
            body["name"] = name;
            let errors = validate_create_agent(&payload(body));
            assert_eq!(errors.get("name"), Some(expected));
        }
    }

    #[test]
    fn test_role_rules() {
        let mut body = valid();
        body["role"] = json!("Sergeant");
        let errors = validate_create_agent(&payload(body));
        assert_eq!(
            errors.get("role"),
            Some("Role is not valid. Valid roles are: Officer, Detective, Captain, Chief")
        );

        let mut body = valid();
        body["role"] = json!("Officer");
        assert!(validate_create_agent(&payload(body)).is_empty());
    }

    #[test]
    fn test_incorporation_date_rules() {
        let cases = [
            (json!(20240115), "Incorporation date must be a string"),
            (
                json!("2024-01-15"),
                "Incorporation date must follow the 'YYYY/MM/DD' format",
            ),
            (json!("2023/02/30"), "Incorporation date must be a valid date"),
            (json!("2024/13/01"), "Incorporation date must be a valid date"),
        ];
        for (date, expected) in cases {
            let mut body = valid();
            body["incorporationDate"] = date;
            let errors = validate_create_agent(&payload(body));
            assert_eq!(errors.get("incorporationDate"), Some(expected));
        }
    }

    #[test]
    fn test_patch_empty_body() {
        let errors = validate_patch_agent(&payload(json!({})));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("body"),
            Some("At least one field (name, role, incorporation date) must be provided for update")
        );
    }

    #[test]
    fn test_patch_checks_only_supplied_fields() {
        let p = payload(json!({ "role": "Captain" }));
        assert!(validate_patch_agent(&p).is_empty());
        let patch = p.to_patch();
        assert_eq!(patch.role, Some(AgentRole::Captain));
        assert_eq!(patch.name, None);
        assert_eq!(patch.incorporation_date, None);
    }

    #[test]
    fn test_patch_supplied_empty_value_fails() {
        let errors = validate_patch_agent(&payload(json!({ "name": "" })));
        assert_eq!(errors.get("name"), Some("Name field is required"));
        assert!(!errors.contains("body"));
    }
}
