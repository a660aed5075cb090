//! Skill profile and skill catalogue routes

use axum::Router;
use domain_users::{
    MongoSkillProfileRepository, MongoSkillRepository, MongoUserRepository, SkillService,
    skill_handlers,
};
use std::sync::Arc;

use crate::state::AppState;

type MongoSkillService =
    SkillService<MongoUserRepository, MongoSkillProfileRepository, MongoSkillRepository>;

fn service(state: &AppState) -> MongoSkillService {
    SkillService::new(
        Arc::new(MongoUserRepository::new(&state.db)),
        Arc::new(MongoSkillProfileRepository::new(&state.db)),
        Arc::new(MongoSkillRepository::new(&state.db)),
    )
}

pub fn profiles_router(state: &AppState) -> Router {
    skill_handlers::profiles_router(service(state))
}

pub fn skills_router(state: &AppState) -> Router {
    skill_handlers::skills_router(service(state))
}
