use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Skill not found: {0}")]
    SkillNotFound(Uuid),

    /// Request is valid but the current state forbids it
    #[error("{0}")]
    BadRequest(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => AppError::InvalidInput(msg),
            UserError::Conflict(msg) => AppError::Conflict(msg),
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::SkillNotFound(_) => AppError::NotFound("Skill not found".to_string()),
            UserError::BadRequest(msg) => AppError::BadRequest(msg),
            UserError::Database(msg) => AppError::Database(msg),
            UserError::PasswordHash(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// `true` when a unique index rejected the write
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
    )
}

impl UserError {
    /// Map a failed write to the `users` collection, where the only unique key is `username`.
    pub(crate) fn from_user_write(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            UserError::Conflict("Duplicate username".to_string())
        } else {
            err.into()
        }
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            UserError::Conflict("Duplicate key".to_string())
        } else {
            UserError::Database(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for UserError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        UserError::Internal(format!("BSON serialization failed: {err}"))
    }
}

impl From<mongodb::bson::raw::Error> for UserError {
    fn from(err: mongodb::bson::raw::Error) -> Self {
        UserError::Internal(format!("BSON conversion failed: {err}"))
    }
}
