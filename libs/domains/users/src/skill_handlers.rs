use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppJson, ValidatedJson,
    errors::{
        ErrorResponse,
        responses::{BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse},
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{CreateSkill, CreateSkillProfile, Skill, SkillProfile};
use crate::repository::{SkillProfileRepository, SkillRepository, UserRepository};
use crate::skill_service::SkillService;

/// OpenAPI documentation for skill profiles and the skill catalogue
#[derive(OpenApi)]
#[openapi(
    paths(list_profiles, create_profile, list_skills, create_skill),
    components(
        schemas(SkillProfile, CreateSkillProfile, Skill, CreateSkill, ErrorResponse),
        responses(NotFoundResponse, BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Skills", description = "Skill profiles and skill catalogue")
    )
)]
pub struct SkillsApiDoc;

type SharedService<U, P, S> = Arc<SkillService<U, P, S>>;

pub fn profiles_router<U, P, S>(service: SkillService<U, P, S>) -> Router
where
    U: UserRepository + 'static,
    P: SkillProfileRepository + 'static,
    S: SkillRepository + 'static,
{
    Router::new()
        .route(
            "/",
            get(list_profiles::<U, P, S>).post(create_profile::<U, P, S>),
        )
        .with_state(Arc::new(service))
}

pub fn skills_router<U, P, S>(service: SkillService<U, P, S>) -> Router
where
    U: UserRepository + 'static,
    P: SkillProfileRepository + 'static,
    S: SkillRepository + 'static,
{
    Router::new()
        .route("/", get(list_skills::<U, P, S>).post(create_skill::<U, P, S>))
        .with_state(Arc::new(service))
}

/// List skill profiles
#[utoipa::path(
    get,
    path = "/skill-profiles",
    tag = "Skills",
    responses(
        (status = 200, description = "All skill profiles", body = Vec<SkillProfile>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_profiles<U, P, S>(
    State(service): State<SharedService<U, P, S>>,
) -> UserResult<Json<Vec<SkillProfile>>>
where
    U: UserRepository,
    P: SkillProfileRepository,
    S: SkillRepository,
{
    Ok(Json(service.list_profiles().await?))
}

/// Create a skill profile for an existing user
#[utoipa::path(
    post,
    path = "/skill-profiles",
    tag = "Skills",
    request_body = CreateSkillProfile,
    responses(
        (status = 201, description = "Profile created", body = SkillProfile),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_profile<U, P, S>(
    State(service): State<SharedService<U, P, S>>,
    AppJson(input): AppJson<CreateSkillProfile>,
) -> UserResult<impl IntoResponse>
where
    U: UserRepository,
    P: SkillProfileRepository,
    S: SkillRepository,
{
    let profile = service.create_profile(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// List skills ordered by sequence number
#[utoipa::path(
    get,
    path = "/skills",
    tag = "Skills",
    responses(
        (status = 200, description = "All skills", body = Vec<Skill>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_skills<U, P, S>(
    State(service): State<SharedService<U, P, S>>,
) -> UserResult<Json<Vec<Skill>>>
where
    U: UserRepository,
    P: SkillProfileRepository,
    S: SkillRepository,
{
    Ok(Json(service.list_skills().await?))
}

/// Add a skill to the catalogue
#[utoipa::path(
    post,
    path = "/skills",
    tag = "Skills",
    request_body = CreateSkill,
    responses(
        (status = 201, description = "Skill created", body = Skill),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_skill<U, P, S>(
    State(service): State<SharedService<U, P, S>>,
    ValidatedJson(input): ValidatedJson<CreateSkill>,
) -> UserResult<impl IntoResponse>
where
    U: UserRepository,
    P: SkillProfileRepository,
    S: SkillRepository,
{
    let skill = service.create_skill(input).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}
