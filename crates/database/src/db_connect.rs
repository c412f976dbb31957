use anyhow::Context;
use app_config::DatabaseConfig;
use app_error::{AppError, AppErrorExt, AppResult};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use surrealdb::opt::auth::Root;

use crate::{Database, DbHandle, cache::Connector};

#[derive(Clone)]
pub struct DbCredentials {
    username: String,
    password: String,
}

impl DbCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_password(&self) -> &str {
        &self.password
    }
}

// Don't accidentally log credentials
impl std::fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Connects to SurrealDB through the `any` engine, so the endpoint scheme
/// (`ws://`, `wss://`, `memory`) picks the transport.
#[derive(Debug, Clone)]
pub struct SurrealConnector {
    endpoint: String,
    namespace: String,
    database: String,
    credentials: Option<DbCredentials>,
}

impl SurrealConnector {
    pub fn new(
        endpoint: impl Into<String>,
        namespace: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: namespace.into(),
            database: database.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: DbCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        let connector = Self::new(&config.url, &config.namespace, &config.database);
        match config.credentials() {
            Some((username, password)) => {
                connector.with_credentials(DbCredentials::new(username, password))
            }
            None => connector,
        }
    }

    pub fn memory(namespace: impl Into<String>, database: impl Into<String>) -> Self {
        Self::new("memory", namespace, database)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Connector for SurrealConnector {
    type Handle = DbHandle;

    async fn connect(&self) -> AppResult<DbHandle> {
        if self.namespace.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Database namespace cannot be empty".into(),
            ));
        }

        if self.database.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Database name cannot be empty".into(),
            ));
        }

        if self.endpoint.starts_with("wss://") {
            tracing::info!("Using secure TLS connection to database");
        } else if !self.endpoint.starts_with("mem") {
            tracing::warn!("Using non-secure database connection");
        }

        let conn = surrealdb::engine::any::connect(self.endpoint.as_str())
            .await
            .context("Failed to connect to database")
            .db_err()?;

        if let Some(credentials) = &self.credentials {
            tracing::debug!(username = credentials.get_username(), "Signing in to database");
            conn.signin(Root {
                username: credentials.get_username(),
                password: credentials.get_password(),
            })
            .await
            .context("Failed to authenticate with database")
            .db_err()?;
        }

        conn.use_ns(self.namespace.as_str())
            .use_db(self.database.as_str())
            .await
            .context("Failed to select namespace and database")
            .db_err()?;

        Ok(conn)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Build the shared database handle. No I/O happens until the first
/// repository call acquires it.
pub fn initialize_db(config: &DatabaseConfig) -> Arc<Database> {
    tracing::debug!("Configuring SurrealDB at {}", config.url);

    let connector = SurrealConnector::from_config(config);
    let db = Database::new(connector)
        .with_connect_timeout(Duration::from_secs(config.connect_timeout_secs));

    Arc::new(db)
}

pub fn initialize_memory_db(namespace: &str, database: &str) -> Arc<Database> {
    Arc::new(Database::new(SurrealConnector::memory(namespace, database)))
}
