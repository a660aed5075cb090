use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, UuidPath,
    errors::{
        ErrorResponse,
        responses::{
            BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
            NotFoundResponse,
        },
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{
    ALL_FIELDS_REQUIRED, CreateUser, DeleteUser, MessageResponse, USER_ID_REQUIRED, UpdateUser,
    UserResponse,
};
use crate::password::PasswordHasher;
use crate::repository::{SkillProfileRepository, UserRepository};
use crate::service::UserService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user, get_user),
    components(
        schemas(UserResponse, CreateUser, UpdateUser, DeleteUser, MessageResponse, ErrorResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User directory endpoints")
    )
)]
pub struct UsersApiDoc;

type SharedService<U, P, H> = Arc<UserService<U, P, H>>;

/// Unwrap a user request body.
///
/// Well-formed JSON whose fields have the wrong type (`"active": "yes"`,
/// `"roles": "Employee"`) is a missing field as far as callers are concerned.
fn request_body<T>(body: Result<Json<T>, JsonRejection>, missing: &str) -> Result<T, AppError> {
    match body {
        Ok(Json(input)) => Ok(input),
        Err(JsonRejection::JsonDataError(_)) => {
            Err(UserError::Validation(missing.to_string()).into())
        }
        Err(rejection) => Err(rejection.into()),
    }
}

/// Users router; the id for update and delete travels in the JSON body.
pub fn router<U, P, H>(service: UserService<U, P, H>) -> Router
where
    U: UserRepository + 'static,
    P: SkillProfileRepository + 'static,
    H: PasswordHasher + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_users::<U, P, H>)
                .post(create_user::<U, P, H>)
                .patch(update_user::<U, P, H>)
                .delete(delete_user::<U, P, H>),
        )
        .route("/{id}", get(get_user::<U, P, H>))
        .with_state(shared_service)
}

/// List all users
///
/// Answers 400 when the directory is empty.
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "All users, without passwords", body = Vec<UserResponse>),
        (status = 400, description = "No users found", body = ErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<U, P, H>(
    State(service): State<SharedService<U, P, H>>,
) -> UserResult<Json<Vec<UserResponse>>>
where
    U: UserRepository,
    P: SkillProfileRepository,
    H: PasswordHasher + 'static,
{
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<U, P, H>(
    State(service): State<SharedService<U, P, H>>,
    body: Result<Json<CreateUser>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository,
    P: SkillProfileRepository,
    H: PasswordHasher + 'static,
{
    let input = request_body(body, ALL_FIELDS_REQUIRED)?;
    let message = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Update a user
///
/// Username, roles and active are always overwritten; the password only when supplied.
#[utoipa::path(
    patch,
    path = "",
    tag = "Users",
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<U, P, H>(
    State(service): State<SharedService<U, P, H>>,
    body: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError>
where
    U: UserRepository,
    P: SkillProfileRepository,
    H: PasswordHasher + 'static,
{
    let input = request_body(body, ALL_FIELDS_REQUIRED)?;
    let message = service.update_user(input).await?;
    Ok(Json(message))
}

/// Delete a user
///
/// Refused with 400 while a skill profile references the user.
#[utoipa::path(
    delete,
    path = "",
    tag = "Users",
    request_body = DeleteUser,
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Missing id or user has a skill profile", body = ErrorResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<U, P, H>(
    State(service): State<SharedService<U, P, H>>,
    body: Result<Json<DeleteUser>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError>
where
    U: UserRepository,
    P: SkillProfileRepository,
    H: PasswordHasher + 'static,
{
    let input = request_body(body, USER_ID_REQUIRED)?;
    let message = service.delete_user(input).await?;
    Ok(Json(message))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid UUID", body = ErrorResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<U, P, H>(
    State(service): State<SharedService<U, P, H>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>>
where
    U: UserRepository,
    P: SkillProfileRepository,
    H: PasswordHasher + 'static,
{
    let user = service.get_user(id).await?;
    Ok(Json(user))
}
