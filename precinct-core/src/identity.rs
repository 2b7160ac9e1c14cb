//! Identity types for Precinct entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
pub type EntityId = Uuid;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Strongly-typed identifier for one entity type.
///
/// Keeps agent ids and case ids from being mixed up at compile time while
/// still serializing as a bare UUID string.
pub trait EntityIdType:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Lowercase entity name used in error messages (e.g. "agent").
    const ENTITY_NAME: &'static str;

    /// Wrap a raw UUID.
    fn new(uuid: Uuid) -> Self;

    /// Access the raw UUID.
    fn as_uuid(&self) -> Uuid;

    /// Generate a fresh identifier.
    fn generate() -> Self {
        Self::new(new_entity_id())
    }

    /// Parse the canonical lowercase hyphenated form only.
    ///
    /// Simple hex, braced and `urn:uuid:` spellings are rejected so each id
    /// has exactly one accepted string.
    fn parse(s: &str) -> Option<Self> {
        Uuid::try_parse(s)
            .ok()
            .filter(|uuid| uuid.hyphenated().to_string() == s)
            .map(Self::new)
    }
}

/// Error when a string is not a canonical entity id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {entity} id: {value}")]
pub struct IdParseError {
    pub entity: &'static str,
    pub value: String,
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $entity_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
        pub struct $name(Uuid);

        impl EntityIdType for $name {
            const ENTITY_NAME: &'static str = $entity_name;

            fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| IdParseError {
                    entity: $entity_name,
                    value: s.to_string(),
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of an agent (department personnel).
    AgentId,
    "agent"
);

define_entity_id!(
    /// Identifier of a case (incident assigned to an agent).
    CaseId,
    "case"
);
