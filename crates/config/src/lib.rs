//! Configuration is read from process environment variables, optionally
//! seeded from a `.env` file. `DATABASE_URL` is the only required setting.

use app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

mod config_loader;
pub use config_loader::*;

#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: namespace.into(),
            database: database.into(),
            username: None,
            password: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Root credentials are only used when both halves are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn is_memory(&self) -> bool {
        self.url.starts_with("mem")
    }

    fn collect_errors(&self, is_production: bool, errors: &mut Vec<String>) {
        if self.url.trim().is_empty() {
            errors.push(format!("{} cannot be empty", DATABASE_URL));
        } else if is_production && self.is_memory() {
            errors.push("An in-memory database cannot be used in production".to_string());
        }

        if self.namespace.trim().is_empty() {
            errors.push("Database namespace cannot be empty".to_string());
        }

        if self.database.trim().is_empty() {
            errors.push("Database name cannot be empty".to_string());
        }

        if self.username.is_some() != self.password.is_some() {
            errors.push(
                "SURREALDB_USERNAME and SURREALDB_PASSWORD must be set together".to_string(),
            );
        }

        if self.connect_timeout_secs == 0 {
            errors.push("Database connect timeout must be greater than 0".to_string());
        }
    }
}

// Don't accidentally log credentials
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
    pub request_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid server port: '0' is not a valid port number"
            )));
        }

        if self.host.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Server address cannot be empty"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaffleConfig {
    /// Highest number on sale; the range always starts at 0
    pub max_number: u32,
    pub price_per_number: u64,
    /// Opaque payment token handed to participants as-is
    pub payment_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub sentry_dsn: Option<String>,
}
