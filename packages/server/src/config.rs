use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use common::storage::s3::S3Config;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty mirrors the request origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
    /// Maximum accepted request body for `/detect`.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HMAC secret for session tokens.
    pub session_secret: String,
    /// OAuth client ID the identity provider's ID tokens are issued to.
    pub google_client_id: String,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    #[serde(default = "default_issuers")]
    pub issuers: Vec<String>,
    #[serde(default = "default_jwks_refresh_secs")]
    pub jwks_refresh_secs: u64,
    /// Mark session cookies `Secure`. Browsers drop `SameSite=None` cookies without it.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Filesystem,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    pub root: PathBuf,
    /// Public URL prefix; the server serves `root` under `/images`.
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default = "default_max_object_bytes")]
    pub max_object_bytes: u64,
    pub filesystem: Option<FilesystemStorageConfig>,
    pub s3: Option<S3Config>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Full URL of the prediction endpoint.
    pub url: String,
    #[serde(default = "default_prediction_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StatsConfig {
    /// Offset from UTC used to decide calendar days and months.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl StatsConfig {
    /// The configured offset, falling back to UTC when out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_max_object_bytes() -> u64 {
    10 * 1024 * 1024
}
fn default_jwks_url() -> String {
    "https://www.googleapis.com/oauth2/v3/certs".into()
}
fn default_issuers() -> Vec<String> {
    vec![
        "accounts.google.com".into(),
        "https://accounts.google.com".into(),
    ]
}
fn default_jwks_refresh_secs() -> u64 {
    3600
}
fn default_prediction_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 9000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.filesystem.root", "./data/images")?
            .set_default(
                "storage.filesystem.public_base_url",
                "http://localhost:9000/images",
            )?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PLATEWATCH__AUTH__SESSION_SECRET)
            .add_source(
                Environment::with_prefix("PLATEWATCH")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .with_list_parse_key("auth.issuers"),
            )
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.session_secret.len() < 32 {
            return Err(ConfigError::Message(
                "auth.session_secret must be at least 32 bytes".into(),
            ));
        }
        match self.storage.backend {
            StorageBackend::S3 if self.storage.s3.is_none() => Err(ConfigError::Message(
                "storage.backend = \"s3\" requires a [storage.s3] section".into(),
            )),
            StorageBackend::Filesystem if self.storage.filesystem.is_none() => {
                Err(ConfigError::Message(
                    "storage.backend = \"filesystem\" requires a [storage.filesystem] section"
                        .into(),
                ))
            }
            _ => Ok(()),
        }?;
        if self.stats.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::Message(
                "stats.utc_offset_minutes must be within one day".into(),
            ));
        }
        Ok(())
    }
}
