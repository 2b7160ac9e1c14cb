//! Error Types for Precinct API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for the `{status, message, errors}` response envelope
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with the matching HTTP status code.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use precinct_core::{StorageError, ValidationErrors};
use serde::Serialize;
use std::fmt;

/// Message for every client-side input error.
pub const INVALID_PARAMETERS: &str = "Invalid parameters";

/// Message for lookups that name an id which does not resolve.
pub const INVALID_ID: &str = "Invalid ID";

/// Message for server-side failures.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error categories, each mapping to one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Client Errors (400)
    // ========================================================================
    /// Body failed field validation
    ValidationFailed,

    /// Query parameter is missing or not acceptable
    InvalidQuery,

    /// Path id is not a well-formed id
    InvalidId,

    /// Body is not a JSON object
    InvalidBody,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested entity does not exist
    EntityNotFound,

    /// Repository found the id in its index but not in its collection
    DeleteFailed,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// A stored reference points at an entity that no longer exists
    DanglingReference,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidQuery
            | ErrorCode::InvalidId
            | ErrorCode::InvalidBody => StatusCode::BAD_REQUEST,

            ErrorCode::EntityNotFound | ErrorCode::DeleteFailed => StatusCode::NOT_FOUND,

            ErrorCode::DanglingReference | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// ERROR DETAILS
// ============================================================================

/// The `errors` member of the envelope: a list of messages or a field map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    List(Vec<String>),
    Fields(ValidationErrors),
}

impl Default for ErrorDetails {
    fn default() -> Self {
        ErrorDetails::List(Vec::new())
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error category, not part of the response body
    #[serde(skip)]
    pub code: ErrorCode,

    /// HTTP status code, repeated in the body
    #[cfg_attr(feature = "openapi", schema(example = 400))]
    pub status: u16,

    /// Human-readable error message
    #[cfg_attr(feature = "openapi", schema(example = "Invalid parameters"))]
    pub message: String,

    /// List of messages, or field name to message mapping
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub errors: ErrorDetails,
}

impl ApiError {
    /// Create a new API error with the given code and message and no details.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: code.status_code().as_u16(),
            message: message.into(),
            errors: ErrorDetails::default(),
        }
    }

    /// Replace the details with a list of messages.
    pub fn with_errors<I, S>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors = ErrorDetails::List(errors.into_iter().map(Into::into).collect());
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Body failed field validation.
    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self {
            errors: ErrorDetails::Fields(errors),
            ..Self::new(ErrorCode::ValidationFailed, INVALID_PARAMETERS)
        }
    }

    /// A query parameter was rejected.
    pub fn invalid_query(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidQuery, INVALID_PARAMETERS).with_errors([detail.into()])
    }

    /// A path id is not well formed.
    pub fn invalid_id(entity_name: &str, raw: &str) -> Self {
        Self::new(ErrorCode::InvalidId, INVALID_PARAMETERS)
            .with_errors([format!("'{}' is not a valid {} id", raw, entity_name)])
    }

    /// The request body could not be read as a JSON object.
    pub fn invalid_body(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidBody, INVALID_PARAMETERS).with_errors([detail.into()])
    }

    /// "`<Entity>` with id '`<id>`' not found", with no further details.
    pub fn not_found(entity_label: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityNotFound,
            format!("{} with id '{}' not found", entity_label, id),
        )
    }

    /// "Invalid ID", naming the id that did not resolve in the details.
    pub fn unresolved_id(entity_label: &str, id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::EntityNotFound, INVALID_ID)
            .with_errors([format!("{} with id '{}' not found", entity_label, id)])
    }

    /// Deletion hit an index/collection mismatch.
    pub fn delete_failed(entity_name: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::DeleteFailed,
            format!("Failed to delete {} with id '{}'", entity_name, id),
        )
    }

    /// A case's responsible agent no longer exists.
    pub fn dangling_agent(case_id: impl fmt::Display, agent_id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DanglingReference, INTERNAL_SERVER_ERROR).with_errors([
            format!(
                "Case with id '{}' does not have a valid responsible agent",
                case_id
            ),
            format!("Found agentId: {}", agent_id),
        ])
    }

    /// Create an InternalError error.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, INTERNAL_SERVER_ERROR).with_errors([detail.into()])
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage error");
        ApiError::internal_error(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::invalid_body(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_query(rejection.body_text())
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::ValidationFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::EntityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::DeleteFailed.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::DanglingReference.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_with_list() -> Result<(), serde_json::Error> {
        let err = ApiError::unresolved_id("Case", "abc");
        let value = serde_json::to_value(&err)?;
        assert_eq!(
            value,
            json!({
                "status": 404,
                "message": "Invalid ID",
                "errors": ["Case with id 'abc' not found"],
            })
        );
        Ok(())
    }

    #[test]
    fn test_envelope_with_field_map() -> Result<(), serde_json::Error> {
        let mut fields = ValidationErrors::new();
        fields.insert("name", "Name field is required");
        let value = serde_json::to_value(ApiError::validation_failed(fields))?;
        assert_eq!(value["status"], json!(400));
        assert_eq!(value["message"], json!("Invalid parameters"));
        assert_eq!(value["errors"], json!({ "name": "Name field is required" }));
        assert!(value.get("code").is_none());
        Ok(())
    }

    #[test]
    fn test_not_found_has_empty_errors() {
        let err = ApiError::not_found("Agent", "42");
        assert_eq!(err.message, "Agent with id '42' not found");
        assert_eq!(err.errors, ErrorDetails::List(Vec::new()));
        assert_eq!(err.status, 404);
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err = ApiError::from(StorageError::LockPoisoned);
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::delete_failed("agent", "42");
        let display = err.to_string();
        assert!(display.contains("DeleteFailed"));
        assert!(display.contains("Failed to delete agent with id '42'"));
    }
}
