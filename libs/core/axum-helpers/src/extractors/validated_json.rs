//! JSON extractor that also runs `validator` rules.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body checked with [`Validate`] before the handler runs.
///
/// A failed rule answers 400 with per-field `details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateSkill {
///     #[validate(length(min = 1))]
///     skill_name: String,
/// }
///
/// async fn create_skill(ValidatedJson(input): ValidatedJson<CreateSkill>) { ... }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
