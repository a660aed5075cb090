//! JSON body extractor whose rejections use the API error body.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

/// Drop-in replacement for [`axum::Json`] as an extractor.
///
/// Syntax and type errors answer 400 with an `ErrorResponse`; a missing
/// `Content-Type: application/json` keeps its 415.
///
/// ```ignore
/// async fn create(AppJson(input): AppJson<CreateUser>) -> impl IntoResponse { ... }
/// ```
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(data))
    }
}
