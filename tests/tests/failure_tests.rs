use app_config::AppConfig;
use app_error::AppError;
use app_test::{
    FailingRaffleService, STORE_FAULT_DETAIL, app_with_service, send, setup_unreachable_app,
    test_config,
};
use axum::http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_missing_database_url_is_fatal() {
    let result = AppConfig::from_lookup(|key| match key {
        "PORT" => Some("3000".to_string()),
        _ => None,
    });

    assert!(matches!(result, Err(AppError::ConfigError(_))));
}

#[tokio::test]
async fn test_store_fault_returns_generic_error() {
    let config = test_config();
    let app = app_with_service(Arc::new(FailingRaffleService), &config);

    let responses = [
        send(
            &app,
            Method::POST,
            "/api/saveRifa",
            Some(json!({"name": "Ana", "numbers": [1]})),
        )
        .await,
        send(&app, Method::GET, "/api/rifa", None).await,
        send(&app, Method::GET, "/api/getRifas", None).await,
    ];

    for response in responses {
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["code"], "DB_ERROR");
        assert!(response.body.get("details").is_none());
        assert!(!response.body.to_string().contains(STORE_FAULT_DETAIL));
    }
}

#[tokio::test]
async fn test_unreachable_store_reports_unavailable_and_retries() {
    let (app, db) = setup_unreachable_app();

    let first = send(&app, Method::GET, "/api/getRifas", None).await;
    assert_eq!(first.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(first.body["code"], "DB_UNAVAILABLE");
    assert!(!first.body.to_string().contains("bogus"));
    assert_eq!(db.attempts(), 1);

    // The failure is not cached
    let second = send(&app, Method::GET, "/api/rifa", None).await;
    assert_eq!(second.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(db.attempts(), 2);
    assert!(!db.is_connected());
}
