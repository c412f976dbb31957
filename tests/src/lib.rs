//! Shared setup for the HTTP-level tests.

use app_config::AppConfig;
use app_database::{Database, DbCredentials, SurrealConnector, service::DbService};
use app_error::{AppError, AppResult};
use app_models::{CreateRaffleInput, PaymentInfo, RaffleEntry, RaffleSummary};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{HeaderMap, Method, StatusCode},
};
use micro_raffle::{RaffleService, RaffleServiceTrait, SharedRaffleService, create_routes};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

pub const TEST_PAYMENT_CODE: &str = "00020126-test-payment";

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("memory".to_string()),
        "SURREALDB_NAMESPACE" => Some("test_namespace".to_string()),
        "SURREALDB_DATABASE" => Some("test_database".to_string()),
        "RAFFLE_MAX_NUMBER" => Some("20".to_string()),
        "PAYMENT_CODE" => Some(TEST_PAYMENT_CODE.to_string()),
        _ => None,
    })
    .expect("test configuration is valid")
}

pub fn app_with_service(service: SharedRaffleService, config: &AppConfig) -> Router {
    create_routes(service, config)
}

fn app_with_database(db: Arc<Database>, config: &AppConfig) -> Router {
    let entries = Arc::new(DbService::<RaffleEntry>::new(db, RaffleEntry::TABLE));
    let service: SharedRaffleService =
        Arc::new(RaffleService::new(entries, config.raffle.clone()));
    app_with_service(service, config)
}

/// Router over a fresh in-memory store, plus the store handle for assertions
pub fn setup_test_app() -> (Router, Arc<Database>) {
    let config = test_config();
    let db = app_database::db_connect::initialize_db(&config.database);
    (app_with_database(Arc::clone(&db), &config), db)
}

/// Router whose store can never be reached
pub fn setup_unreachable_app() -> (Router, Arc<Database>) {
    let config = test_config();
    let connector = SurrealConnector::new("bogus://nowhere", "test_namespace", "test_database")
        .with_credentials(DbCredentials::new("root", "root"));
    let db = Arc::new(Database::new(connector).with_connect_timeout(Duration::from_secs(2)));
    (app_with_database(Arc::clone(&db), &config), db)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("valid request"))
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    TestResponse {
        status,
        headers,
        body,
    }
}

pub const STORE_FAULT_DETAIL: &str = "disk full on node rifa-db-0";

/// Every store-backed call fails with an internal detail that must not leak
pub struct FailingRaffleService;

#[async_trait]
impl RaffleServiceTrait for FailingRaffleService {
    async fn create_entry(&self, _input: CreateRaffleInput) -> AppResult<RaffleEntry> {
        Err(AppError::DatabaseError(anyhow::anyhow!(STORE_FAULT_DETAIL)))
    }

    async fn list_entries(&self) -> AppResult<Vec<RaffleEntry>> {
        Err(AppError::DatabaseError(anyhow::anyhow!(STORE_FAULT_DETAIL)))
    }

    async fn list_purchased_numbers(&self) -> AppResult<Vec<u32>> {
        Err(AppError::DatabaseError(anyhow::anyhow!(STORE_FAULT_DETAIL)))
    }

    async fn summary(&self) -> AppResult<RaffleSummary> {
        Err(AppError::DatabaseError(anyhow::anyhow!(STORE_FAULT_DETAIL)))
    }

    fn payment_info(&self) -> PaymentInfo {
        PaymentInfo {
            code: TEST_PAYMENT_CODE.to_string(),
        }
    }
}
