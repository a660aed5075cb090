use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use std::path::PathBuf;

use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Argon2 time cost used when `PASSWORD_HASH_COST` is unset
pub const DEFAULT_PASSWORD_HASH_COST: u32 = 2;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Directory served for non-API paths (`PUBLIC_DIR`, default `public`)
    pub public_dir: PathBuf,
    /// Argon2 time cost for password hashes (`PASSWORD_HASH_COST`)
    pub password_hash_cost: u32,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let public_dir = PathBuf::from(env_or_default("PUBLIC_DIR", "public"));
        let password_hash_cost = env_parse("PASSWORD_HASH_COST", DEFAULT_PASSWORD_HASH_COST)?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            public_dir,
            password_hash_cost,
        })
    }
}
