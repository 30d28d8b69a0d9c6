//! Request body extraction for the web API.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form, Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::board::BoardName;
use crate::web::error::ApiError;

/// The `:board` path segment, parsed into a [`BoardName`].
///
/// Undecodable segments and invalid names are both rejected with a JSON error.
pub struct BoardPath(pub BoardName);

#[async_trait]
impl<S> FromRequestParts<S> for BoardPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(board) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(BoardPath(BoardName::parse(&board)?))
    }
}

/// Query string extractor that rejects with a JSON error.
pub struct BoardQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for BoardQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(BoardQuery(value))
    }
}

/// A body extractor that accepts JSON or URL-encoded forms and validates the
/// result.
///
/// A request without a `Content-Type` is treated as carrying no fields, so
/// that every field reads as missing and the handler can answer with its own
/// message.
///
/// # Example
///
/// ```ignore
/// use anonboard::web::dto::BoardForm;
///
/// async fn create_thread(
///     BoardForm(req): BoardForm<CreateThreadRequest>,
/// ) -> Result<Json<CreatedResponse>, ApiError> {
///     // req is already validated
///     // ...
/// }
/// ```
pub struct BoardForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for BoardForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());

        let value = match content_type {
            None => T::default(),
            Some(ct) if ct.starts_with("application/json") => {
                let Json(value) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;
                value
            }
            Some(_) => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid form: {}", e)))?;
                value
            }
        };

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(BoardForm(value))
    }
}
