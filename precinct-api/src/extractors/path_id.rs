//! Path extractor for typed entity ids.
//!
//! `PathId<T>` reads the single `:id` path segment and parses it into an
//! [`EntityIdType`] newtype. A segment that is not a UUID is rejected with the
//! standard 400 envelope naming the entity type and the raw segment.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use precinct_core::EntityIdType;

use crate::error::ApiError;

/// Extractor for type-safe entity IDs from path parameters.
///
/// ```rust,ignore
/// async fn get_agent(PathId(agent_id): PathId<AgentId>) -> ApiResult<impl IntoResponse> {
///     // agent_id is AgentId, not Uuid
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathId<T: EntityIdType>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: EntityIdType,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_id(T::ENTITY_NAME, &e.body_text()))?;

        T::parse(&raw)
            .map(PathId)
            .ok_or_else(|| ApiError::invalid_id(T::ENTITY_NAME, &raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use precinct_core::AgentId;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/agents/:id",
            get(|PathId(id): PathId<AgentId>| async move { id.to_string() }),
        )
    }

    async fn call(uri: &str) -> (StatusCode, serde_json::Value, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let json = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
        (status, json, text)
    }

    #[tokio::test]
    async fn test_valid_uuid_is_extracted() {
        let id = AgentId::generate();
        let (status, _, text) = call(&format!("/agents/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, id.to_string());
    }

    #[tokio::test]
    async fn test_non_uuid_is_rejected() {
        let (status, json, _) = call("/agents/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], 400);
        assert_eq!(json["message"], "Invalid parameters");
        assert_eq!(json["errors"][0], "'not-a-uuid' is not a valid agent id");
    }
}
