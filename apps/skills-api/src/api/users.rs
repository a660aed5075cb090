//! Users API routes

use axum::Router;
use domain_users::{MongoSkillProfileRepository, MongoUserRepository, UserService, handlers};
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = UserService::new(
        Arc::new(MongoUserRepository::new(&state.db)),
        Arc::new(MongoSkillProfileRepository::new(&state.db)),
        Arc::clone(&state.password_hasher),
    );

    handlers::router(service)
}
