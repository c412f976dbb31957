use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};
use tracing::{debug, info};

use app_error::{AppError, AppResult};

use crate::{DatabaseConfig, MonitoringConfig, RaffleConfig, ServerConfig};

pub const DATABASE_URL: &str = "DATABASE_URL";

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_NUMBER: u32 = 100;
pub const DEFAULT_PRICE_PER_NUMBER: u64 = 50;

/// Complete application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub raffle: RaffleConfig,
    pub monitoring: MonitoringConfig,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_blank(lookup(key)) {
        Some(raw) => raw.parse::<T>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value '{}' for {}: {}", raw, key, e))
        }),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first
    pub fn from_env() -> AppResult<Self> {
        // Load .env file only once per process
        dotenv().ok();

        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("Loaded configuration for environment: {}", config.environment);
        Ok(config)
    }

    /// Build and validate a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let url = non_blank(lookup(DATABASE_URL)).ok_or_else(|| AppError::missing_setting(DATABASE_URL))?;

        let database = DatabaseConfig {
            url,
            namespace: non_blank(lookup("SURREALDB_NAMESPACE")).unwrap_or(defaults.database.namespace),
            database: non_blank(lookup("SURREALDB_DATABASE")).unwrap_or(defaults.database.database),
            username: non_blank(lookup("SURREALDB_USERNAME")),
            password: non_blank(lookup("SURREALDB_PASSWORD")),
            connect_timeout_secs: parse_or(&lookup, "DB_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        let server = ServerConfig {
            host: non_blank(lookup("ADDRESS")).unwrap_or(defaults.server.host),
            port: parse_or(&lookup, "PORT", defaults.server.port)?,
            body_limit: parse_or(&lookup, "BODY_LIMIT", defaults.server.body_limit)?,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.server.request_timeout_secs)?,
            allowed_origins: non_blank(lookup("CORS_ALLOWED_ORIGINS"))
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.server.allowed_origins),
        };

        let raffle = RaffleConfig {
            max_number: parse_or(&lookup, "RAFFLE_MAX_NUMBER", DEFAULT_MAX_NUMBER)?,
            price_per_number: parse_or(&lookup, "RAFFLE_PRICE_PER_NUMBER", DEFAULT_PRICE_PER_NUMBER)?,
            payment_code: non_blank(lookup("PAYMENT_CODE")).unwrap_or(defaults.raffle.payment_code),
        };

        let monitoring = MonitoringConfig {
            log_level: non_blank(lookup("LOG_LEVEL")).unwrap_or(defaults.monitoring.log_level),
            sentry_dsn: non_blank(lookup("SENTRY_DSN")),
        };

        let config = Self {
            environment: non_blank(lookup("APP_ENV")).unwrap_or(defaults.environment),
            database,
            server,
            raffle,
            monitoring,
        };

        config.validate()?;
        debug!("Configuration validated");
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Validate the configuration, reporting every problem at once
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        self.database.collect_errors(self.is_production(), &mut errors);

        if let Err(e) = self.server.validate() {
            errors.push(e.to_string());
        }

        if self.server.body_limit == 0 {
            errors.push("Body limit must be greater than 0".to_string());
        }

        if self.server.request_timeout_secs == 0 {
            errors.push("Request timeout must be greater than 0".to_string());
        }

        if self.raffle.price_per_number == 0 {
            errors.push("Raffle price per number must be greater than 0".to_string());
        }

        if !errors.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid configuration: {}",
                errors.join(", ")
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            database: DatabaseConfig::new("memory", "rifa", "rifa"),
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                body_limit: 1048576, // 1MB
                request_timeout_secs: 30,
                allowed_origins: vec!["*".to_string()],
            },
            raffle: RaffleConfig {
                max_number: DEFAULT_MAX_NUMBER,
                price_per_number: DEFAULT_PRICE_PER_NUMBER,
                payment_code: String::new(),
            },
            monitoring: MonitoringConfig {
                log_level: "info".to_string(),
                sentry_dsn: None,
            },
        }
    }
}
