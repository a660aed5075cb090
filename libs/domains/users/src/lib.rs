//! Users Domain
//!
//! User directory with skill profiles and a skill catalogue, stored in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints + OpenAPI
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, uniqueness, hashing, delete guard
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Traits with MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities and request DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{
//!     Argon2PasswordHasher, InMemorySkillProfileRepository, InMemoryUserRepository,
//!     UserService, handlers,
//! };
//!
//! let service = UserService::new(
//!     Arc::new(InMemoryUserRepository::new()),
//!     Arc::new(InMemorySkillProfileRepository::new()),
//!     Arc::new(Argon2PasswordHasher::new(2).unwrap()),
//! );
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod repository;
pub mod service;
pub mod skill_handlers;
pub mod skill_service;

pub use error::{UserError, UserResult};
pub use handlers::UsersApiDoc;
pub use models::{
    CreateSkill, CreateSkillProfile, CreateUser, DeleteUser, MessageResponse, Skill, SkillProfile,
    UpdateUser, User, UserResponse,
};
pub use mongodb::{
    MongoSkillProfileRepository, MongoSkillRepository, MongoUserRepository, create_indexes,
};
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use repository::{
    InMemorySkillProfileRepository, InMemorySkillRepository, InMemoryUserRepository,
    SkillProfileRepository, SkillRepository, UserRepository,
};
pub use service::UserService;
pub use skill_handlers::SkillsApiDoc;
pub use skill_service::SkillService;
