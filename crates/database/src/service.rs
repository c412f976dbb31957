use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{marker::PhantomData, sync::Arc};

use app_error::{AppError, AppErrorExt, AppResult, with_context};

use crate::{Database, DbHandle};

lazy_static! {
    // SurrealDB identifier rules for table and field names
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

// Validate identifier for SQL injection prevention
pub fn validate_identifier(identifier: &str) -> AppResult<()> {
    if !IDENTIFIER_REGEX.is_match(identifier) {
        return Err(AppError::ValidationError(format!(
            "Invalid identifier '{}': must start with a letter or underscore and contain only alphanumeric characters and underscores",
            identifier
        )));
    }

    Ok(())
}

/// Typed access to one table through the shared connection
pub struct DbService<T> {
    db: Arc<Database>,
    table_name: String,
    _phantom: PhantomData<T>,
}

impl<T> DbService<T>
where
    T: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static,
{
    pub fn new(db: Arc<Database>, table_name: impl Into<String>) -> Self {
        Self {
            db,
            table_name: table_name.into(),
            _phantom: PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn connection(&self) -> AppResult<DbHandle> {
        self.db.acquire().await
    }

    // Generic DB operation wrapper with consistent error handling and logging
    async fn execute_db_operation<F, R>(&self, operation: &str, execute: F) -> AppResult<R>
    where
        F: Future<Output = AppResult<R>>,
    {
        execute.await.map_err(|e| match e {
            AppError::DatabaseError(err) => {
                tracing::error!(table = %self.table_name, "Failed to {} record: {}", operation, err);
                AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to {} {} record: {}",
                    operation,
                    self.table_name,
                    err
                ))
            }
            other => other,
        })
    }

    /// Insert a new record; the store assigns its id
    pub async fn create_record(&self, item: T) -> AppResult<Option<T>> {
        self.execute_db_operation("create", async {
            let conn = self.connection().await?;
            conn.create(self.table_name.as_str())
                .content(item)
                .await
                .context("Failed to create record")
                .db_err()
        })
        .await
    }

    /// Every record in the table, in the store's default order
    pub async fn list_records(&self) -> AppResult<Vec<T>> {
        validate_identifier(&self.table_name)?;
        let sql = format!("SELECT * FROM {}", self.table_name);

        self.execute_db_operation("list", async {
            let conn = self.connection().await?;
            let mut response = with_context!(conn.query(sql).await, "Failed to execute query")?;

            response
                .take(0)
                .context("Failed to extract query results")
                .db_err()
        })
        .await
    }

    /// The value of a single field from every record
    pub async fn select_field_values<V>(&self, field: &str) -> AppResult<Vec<V>>
    where
        V: for<'de> Deserialize<'de>,
    {
        validate_identifier(field)?;
        validate_identifier(&self.table_name)?;
        let sql = format!("SELECT VALUE {} FROM {}", field, self.table_name);

        self.execute_db_operation("query", async {
            let conn = self.connection().await?;
            let mut response = conn
                .query(sql)
                .await
                .context("Failed to execute query")
                .db_err()?;

            response
                .take(0)
                .context("Failed to extract query results")
                .db_err()
        })
        .await
    }
}
