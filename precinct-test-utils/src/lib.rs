//! Precinct Test Utilities
//!
//! Shared test infrastructure for the Precinct workspace:
//! - Proptest generators for agents, cases and request bodies
//! - Fixtures for common scenarios
//! - Assertions over validation results

// Re-export core types for convenience
pub use precinct_core::{
    Agent, AgentDraft, AgentId, AgentRepository, AgentRole, Case, CaseDraft, CaseId,
    CaseRepository, CaseStatus, EntityIdType, EnumCodec, ValidationErrors,
};

use chrono::NaiveDate;
use serde_json::{json, Value};

/// Wire format of incorporation dates.
pub use precinct_core::entities::DATE_FORMAT;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating Precinct entity types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_agent_role() -> impl Strategy<Value = AgentRole> {
        prop::sample::select(AgentRole::VARIANTS.to_vec())
    }

    pub fn arb_case_status() -> impl Strategy<Value = CaseStatus> {
        prop::sample::select(CaseStatus::VARIANTS.to_vec())
    }

    /// Calendar dates between 1990 and 2030.
    pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (1990i32..2030, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
    }

    /// Names that satisfy the name rules (2..=100 chars after trimming).
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,20}( [A-Z][a-z]{1,20})?"
    }

    /// Free text that satisfies the title and description rules.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z]{2,12}( [a-z]{1,12}){0,5}"
    }

    pub fn arb_agent_draft() -> impl Strategy<Value = AgentDraft> {
        (arb_name(), arb_agent_role(), arb_date()).prop_map(|(name, role, incorporation_date)| {
            AgentDraft {
                name,
                role,
                incorporation_date,
            }
        })
    }

    pub fn arb_case_draft(agent_id: AgentId) -> impl Strategy<Value = CaseDraft> {
        (arb_text(), arb_text(), arb_case_status()).prop_map(move |(title, description, status)| {
            CaseDraft {
                title,
                description,
                status,
                agent_id,
            }
        })
    }

    /// A valid agent request body.
    pub fn arb_agent_body() -> impl Strategy<Value = Value> {
        arb_agent_draft().prop_map(|draft| fixtures::agent_body(&draft))
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    pub fn detective_draft() -> AgentDraft {
        AgentDraft {
            name: "Jane Doe".to_string(),
            role: AgentRole::Detective,
            incorporation_date: date(2015, 3, 12),
        }
    }

    pub fn officer_draft() -> AgentDraft {
        AgentDraft {
            name: "John Roe".to_string(),
            role: AgentRole::Officer,
            incorporation_date: date(2019, 11, 2),
        }
    }

    pub fn chief_draft() -> AgentDraft {
        AgentDraft {
            name: "Ada Stone".to_string(),
            role: AgentRole::Chief,
            incorporation_date: date(2001, 6, 30),
        }
    }

    pub fn open_case_draft(agent_id: AgentId) -> CaseDraft {
        CaseDraft {
            title: "Bike theft".to_string(),
            description: "A bicycle was stolen near the central park".to_string(),
            status: CaseStatus::Open,
            agent_id,
        }
    }

    pub fn solved_case_draft(agent_id: AgentId) -> CaseDraft {
        CaseDraft {
            title: "Vandalism".to_string(),
            description: "Graffiti on the town hall walls".to_string(),
            status: CaseStatus::Solved,
            agent_id,
        }
    }

    /// Request body carrying every field of `draft`.
    pub fn agent_body(draft: &AgentDraft) -> Value {
        json!({
            "name": draft.name,
            "role": draft.role.as_str(),
            "incorporationDate": draft.incorporation_date.format(DATE_FORMAT).to_string(),
        })
    }

    /// Request body carrying every field of `draft`.
    pub fn case_body(draft: &CaseDraft) -> Value {
        json!({
            "title": draft.title,
            "description": draft.description,
            "status": draft.status.as_str(),
            "agentId": draft.agent_id.to_string(),
        })
    }

    /// Repositories with three agents and three cases.
    ///
    /// The detective owns the open and solved cases; the officer owns one open
    /// case; the chief owns none.
    pub struct Precinct {
        pub agents: AgentRepository,
        pub cases: CaseRepository,
        pub detective: Agent,
        pub officer: Agent,
        pub chief: Agent,
        pub open_case: Case,
        pub solved_case: Case,
        pub officer_case: Case,
    }

    pub fn precinct() -> Precinct {
        let detective = detective_draft().into_agent(AgentId::generate());
        let officer = officer_draft().into_agent(AgentId::generate());
        let chief = chief_draft().into_agent(AgentId::generate());

        let open_case = open_case_draft(detective.id).into_case(CaseId::generate());
        let solved_case = solved_case_draft(detective.id).into_case(CaseId::generate());
        let officer_case = CaseDraft {
            title: "Noise complaint".to_string(),
            description: "Loud music after midnight".to_string(),
            status: CaseStatus::Open,
            agent_id: officer.id,
        }
        .into_case(CaseId::generate());

        Precinct {
            agents: AgentRepository::with_entities([
                detective.clone(),
                officer.clone(),
                chief.clone(),
            ]),
            cases: CaseRepository::with_entities([
                open_case.clone(),
                solved_case.clone(),
                officer_case.clone(),
            ]),
            detective,
            officer,
            chief,
            open_case,
            solved_case,
            officer_case,
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over validation results.

    use super::*;

    /// Assert that `field` failed with exactly `message`.
    #[track_caller]
    pub fn assert_field_error(errors: &ValidationErrors, field: &str, message: &str) {
        match errors.get(field) {
            Some(actual) => assert_eq!(actual, message, "Wrong message for field '{}'", field),
            None => panic!("Expected an error for '{}', got: {:?}", field, errors),
        }
    }

    /// Assert that validation produced no errors.
    #[track_caller]
    pub fn assert_valid(errors: &ValidationErrors) {
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    /// Assert that no id repeats.
    #[track_caller]
    pub fn assert_unique_ids<I: EntityIdType>(ids: impl IntoIterator<Item = I>) {
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            assert!(seen.insert(id), "Duplicate id {}", id);
        }
    }
}
