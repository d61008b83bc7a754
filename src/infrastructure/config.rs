use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

pub const MIN_JWT_SECRET_BYTES: usize = 32;
const DEV_SECRET_PREFIX: &str = "dev-";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    /// Token lifetime in seconds.
    pub expiration: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("jwt.secret must be at least {MIN_JWT_SECRET_BYTES} bytes, got {0}")]
    WeakJwtSecret(usize),
}

impl Settings {
    /// Built-in defaults, then `config.toml` if present, then `FINTRACK__*` variables
    /// (`FINTRACK__JWT__SECRET`, `FINTRACK__SERVER__PORT`, ...).
    pub fn new() -> Result<Self, SettingsError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://fintrack.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default(
                "jwt.secret",
                "dev-secret-change-me-before-deploying-fintrack",
            )?
            .set_default("jwt.expiration", 3600)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("FINTRACK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.jwt.check()?;
        Ok(settings)
    }
}

impl JwtSettings {
    pub fn check(&self) -> Result<(), SettingsError> {
        if self.secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(SettingsError::WeakJwtSecret(self.secret.len()));
        }
        if self.secret.starts_with(DEV_SECRET_PREFIX) {
            warn!("Using a development JWT secret; set FINTRACK__JWT__SECRET in production");
        }
        Ok(())
    }
}
