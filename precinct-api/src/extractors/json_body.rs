//! JSON object body extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Like `Json<T>`, but only accepts a top-level JSON object and rejects with
/// the standard error envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;

        if !value.is_object() {
            return Err(ApiError::invalid_body("Request body must be a JSON object"));
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| ApiError::invalid_body(e.to_string()))
    }
}
