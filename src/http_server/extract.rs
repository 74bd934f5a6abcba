//! JSON body extractor
//!
//! axum's bare `Json` extractor answers a malformed body with a plain-text
//! parse error. Handlers take `JsonBody<T>` instead, so an unparseable
//! body becomes a `Validation` error like any other bad input and the
//! parser detail never reaches the client.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::error::ApiError;

/// A request body deserialized from JSON, rejecting into `ApiError`
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        ApiError::Validation("Request body must be valid JSON.".to_string())
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
