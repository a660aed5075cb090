//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skills API",
        version = "0.1.0",
        description = "User directory with skill profiles, backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3500", description = "Local development server")
    ),
    nest(
        (path = "/api/users", api = domain_users::UsersApiDoc),
        (path = "/api", api = domain_users::SkillsApiDoc)
    ),
    tags(
        (name = "Users", description = "User directory endpoints"),
        (name = "Skills", description = "Skill profiles and skill catalogue")
    )
)]
pub struct ApiDoc;
