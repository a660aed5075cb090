//! Application state shared by the route builders.

use domain_users::Argon2PasswordHasher;
use mongodb::{Client, Database};
use std::sync::Arc;

/// Cloned into each route builder; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (shares the underlying connection pool)
    pub mongo_client: Client,
    pub db: Database,
    pub password_hasher: Arc<Argon2PasswordHasher>,
}
