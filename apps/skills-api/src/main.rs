use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::Argon2PasswordHasher;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    domain_users::create_indexes(&db).await?;

    let password_hasher = Arc::new(Argon2PasswordHasher::new(config.password_hash_cost)?);

    let state = AppState {
        config,
        mongo_client,
        db,
        password_hasher,
    };

    let api_routes = api::routes(&state);

    let static_dir = state
        .config
        .public_dir
        .is_dir()
        .then_some(state.config.public_dir.as_path());
    if static_dir.is_none() {
        tracing::warn!(
            "Static directory {} not found; serving API only",
            state.config.public_dir.display()
        );
    }

    let router = create_router::<openapi::ApiDoc>(api_routes, static_dir)?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting Skills API with production-ready shutdown (30s timeout)");

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Skills API shutdown complete");
    Ok(())
}
