//! Precinct Core - Domain Types and In-Memory Storage
//!
//! Everything the HTTP layer needs to manage agents and cases without knowing
//! anything about HTTP:
//! - Typed identifiers (`AgentId`, `CaseId`)
//! - Enum codec between symbolic strings and internal tags
//! - Entities and their validated drafts/patches
//! - Declarative field validation shared by both resources
//! - Repositories owning a collection plus an id index kept in sync
//! - Mock data generation for seeding

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod repository;
pub mod seed;
pub mod validation;

pub use entities::{Agent, AgentDraft, AgentPatch, Case, CaseDraft, CasePatch, Entity};
pub use enums::{AgentRole, AgentSort, CaseStatus, EnumCodec};
pub use error::{StorageError, StorageResult};
pub use identity::{new_entity_id, AgentId, CaseId, EntityId, EntityIdType, IdParseError};
pub use repository::{AgentRepository, CaseRepository, Repository, RepositoryOutcome};
pub use validation::{
    agent::{validate_create_agent, validate_patch_agent, validate_put_agent, AgentPayload},
    case::{validate_create_case, validate_patch_case, validate_put_case, CasePayload},
    case::AgentLookup,
    has_validation_errors, is_falsy, validate_field, validate_resource, FieldSpec, Presence, Rule,
    ValidationErrors, ValidationMode,
};
