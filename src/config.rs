//! Application settings, read from the environment (and an optional `.env` file).

use di::{inject, injectable};
use log::warn;
use reqwest::Url;
use sqlx::sqlite::SqliteConnectOptions;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;

pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const AI_SERVICE_URL: &str = "AI_SERVICE_URL";
pub const AI_SERVICE_API_KEY: &str = "AI_SERVICE_API_KEY";
pub const AI_SERVICE_TIMEOUT_SECS: &str = "AI_SERVICE_TIMEOUT_SECS";
pub const CORS_ORIGINS: &str = "CORS_ORIGINS";

const DEFAULT_DATABASE_FILE: &str = "companion.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

static INSTALLED: RwLock<Option<Settings>> = RwLock::new(None);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Upstream AI service connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiServiceSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for AiServiceSettings {
    fn default() -> Self {
        AiServiceSettings {
            base_url: DEFAULT_AI_SERVICE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: SocketAddr,
    pub database: SqliteConnectOptions,
    pub database_max_connections: u32,
    pub ai_service: AiServiceSettings,
    pub cors_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database: SqliteConnectOptions::new()
                .filename(DEFAULT_DATABASE_FILE)
                .create_if_missing(true),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            ai_service: AiServiceSettings::default(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

#[injectable]
impl Settings {
    /// Settings handed to the service provider.
    ///
    /// `more-di` can't register prebuilt values, so the binary (or a test) installs the
    /// effective settings beforehand. Without that the defaults are used.
    #[inject]
    pub fn create() -> Settings {
        Settings::installed().unwrap_or_else(|| {
            warn!("no settings installed, using defaults");
            Settings::default()
        })
    }
}

impl Settings {
    /// Loads `.env` if present and reads the process environment.
    pub fn from_env() -> Result<Settings, ConfigError> {
        dotenvy::dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, falling back to defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(value) = lookup(BIND_ADDRESS) {
            settings.bind_address = SocketAddr::from_str(&value)
                .map_err(|e| ConfigError::invalid(BIND_ADDRESS, &value, e))?;
        }

        if let Some(value) = lookup(DATABASE_URL) {
            settings.database = SqliteConnectOptions::from_str(&value)
                .map_err(|e| ConfigError::invalid(DATABASE_URL, &value, e))?;
        }

        if let Some(value) = lookup(DATABASE_MAX_CONNECTIONS) {
            settings.database_max_connections = match value.parse::<u32>() {
                Ok(0) => return Err(ConfigError::invalid(DATABASE_MAX_CONNECTIONS, &value, "must be at least 1")),
                Ok(n) => n,
                Err(e) => return Err(ConfigError::invalid(DATABASE_MAX_CONNECTIONS, &value, e)),
            };
        }

        if let Some(value) = lookup(AI_SERVICE_URL) {
            let url = Url::parse(&value).map_err(|e| ConfigError::invalid(AI_SERVICE_URL, &value, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::invalid(AI_SERVICE_URL, &value, "scheme must be http or https"));
            }
            settings.ai_service.base_url = value;
        }

        settings.ai_service.api_key = lookup(AI_SERVICE_API_KEY).filter(|key| !key.trim().is_empty());

        if let Some(value) = lookup(AI_SERVICE_TIMEOUT_SECS) {
            settings.ai_service.timeout = match value.parse::<u64>() {
                Ok(0) => return Err(ConfigError::invalid(AI_SERVICE_TIMEOUT_SECS, &value, "must be at least 1")),
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => return Err(ConfigError::invalid(AI_SERVICE_TIMEOUT_SECS, &value, e)),
            };
        }

        if let Some(value) = lookup(CORS_ORIGINS) {
            settings.cors_origins = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect();
        }

        Ok(settings)
    }

    /// Makes these settings the ones resolved by the service provider.
    pub fn install(self) {
        if let Ok(mut slot) = INSTALLED.write() {
            *slot = Some(self);
        }
    }

    /// Removes installed settings.
    pub fn uninstall() {
        if let Ok(mut slot) = INSTALLED.write() {
            *slot = None;
        }
    }

    pub fn installed() -> Option<Settings> {
        INSTALLED.read().ok().and_then(|slot| slot.clone())
    }
}
