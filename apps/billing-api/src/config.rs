use axum_helpers::JwtConfig;
use core_config::{
    app_info, server::ServerConfig, smtp::SmtpConfig, storage::StorageConfig, AppInfo, FromEnv,
};
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub postgres: PostgresConfig,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let postgres = PostgresConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;
        let smtp = SmtpConfig::from_env()?;
        let storage = StorageConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            postgres,
            jwt,
            smtp,
            storage,
        })
    }
}
