//! Error types for Precinct storage

use thiserror::Error;

/// Storage layer errors.
///
/// Expected outcomes such as "no entity with that id" are not errors; see
/// [`RepositoryOutcome`](crate::repository::RepositoryOutcome).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Could not allocate an unused {entity_name} id")]
    IdSpaceExhausted { entity_name: &'static str },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
