//! Enumerated tags and their string codec.
//!
//! Requests carry symbolic strings ("Detective", "Solved"); the domain stores
//! the enum tag. [`EnumCodec`] is the single bidirectional table between the
//! two, and decoding an unknown string yields `None` rather than a default tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// CODEC TRAIT
// ============================================================================

/// Bidirectional mapping between an enum tag and its symbolic string.
pub trait EnumCodec: Sized + Copy + PartialEq + 'static {
    /// Every tag, in ordinal order.
    const VARIANTS: &'static [Self];

    /// Human-readable kind used in parse errors (e.g. "agent role").
    const KIND: &'static str;

    /// Symbolic string form of the tag.
    fn as_str(&self) -> &'static str;

    /// Decode a symbolic string. Unknown strings decode to `None`.
    fn decode(s: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_str() == s)
    }

    /// Position of the tag in declaration order.
    fn ordinal(&self) -> usize {
        Self::VARIANTS
            .iter()
            .position(|v| v == self)
            .unwrap_or_default()
    }

    /// All symbolic names joined for error messages.
    fn valid_names() -> String {
        Self::VARIANTS
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Error when parsing a string that is not a known tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

fn parse_tag<T: EnumCodec>(s: &str) -> Result<T, EnumParseError> {
    T::decode(s).ok_or_else(|| EnumParseError {
        kind: T::KIND,
        value: s.to_string(),
    })
}

// ============================================================================
// AGENT ROLE
// ============================================================================

/// Rank of an agent in the department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AgentRole {
    Officer,
    Detective,
    Captain,
    Chief,
}

impl EnumCodec for AgentRole {
    const VARIANTS: &'static [Self] = &[
        AgentRole::Officer,
        AgentRole::Detective,
        AgentRole::Captain,
        AgentRole::Chief,
    ];
    const KIND: &'static str = "agent role";

    fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Officer => "Officer",
            AgentRole::Detective => "Detective",
            AgentRole::Captain => "Captain",
            AgentRole::Chief => "Chief",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s)
    }
}

// ============================================================================
// CASE STATUS
// ============================================================================

/// Lifecycle status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CaseStatus {
    Open,
    Solved,
}

impl EnumCodec for CaseStatus {
    const VARIANTS: &'static [Self] = &[CaseStatus::Open, CaseStatus::Solved];
    const KIND: &'static str = "case status";

    fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Open => "Open",
            CaseStatus::Solved => "Solved",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s)
    }
}

// ============================================================================
// AGENT SORT
// ============================================================================

/// Sort key accepted by the agent listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentSort {
    /// `incorporationDate`: oldest first.
    IncorporationDateAsc,
    /// `-incorporationDate`: newest first.
    IncorporationDateDesc,
}

impl EnumCodec for AgentSort {
    const VARIANTS: &'static [Self] = &[
        AgentSort::IncorporationDateAsc,
        AgentSort::IncorporationDateDesc,
    ];
    const KIND: &'static str = "sort string";

    fn as_str(&self) -> &'static str {
        match self {
            AgentSort::IncorporationDateAsc => "incorporationDate",
            AgentSort::IncorporationDateDesc => "-incorporationDate",
        }
    }
}

impl AgentSort {
    /// Whether the sort is newest first.
    pub fn is_descending(&self) -> bool {
        matches!(self, AgentSort::IncorporationDateDesc)
    }
}

impl fmt::Display for AgentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentSort {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s)
    }
}
