//! API routes, nested under `/api` by `axum_helpers::create_router`.

pub mod health;
pub mod skills;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/users", users::router(state))
        .nest("/skill-profiles", skills::profiles_router(state))
        .nest("/skills", skills::skills_router(state))
        .merge(health::router(state.clone()))
}
