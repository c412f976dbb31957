use app_test::{TEST_PAYMENT_CODE, send, setup_test_app};
use axum::http::{Method, StatusCode, header};
use serde_json::{Value, json};

fn numbers_of(value: &Value) -> Vec<u64> {
    let mut numbers: Vec<u64> = value
        .as_array()
        .expect("array of numbers")
        .iter()
        .map(|n| n.as_u64().expect("number"))
        .collect();
    numbers.sort();
    numbers
}

#[tokio::test]
async fn test_saved_entry_is_listed() {
    let (app, _db) = setup_test_app();

    let saved = send(
        &app,
        Method::POST,
        "/api/saveRifa",
        Some(json!({"name": "Ana", "numbers": [3, 7, 12]})),
    )
    .await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.body["message"], "Rifa salva com sucesso!");

    let listed = send(&app, Method::GET, "/api/rifa", None).await;
    assert_eq!(listed.status, StatusCode::OK);

    let entries = listed.body.as_array().expect("entries array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Ana");
    assert_eq!(entries[0]["numbers"], json!([3, 7, 12]));
    assert!(!entries[0]["id"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_create_route_accepts_portuguese_field_names() {
    let (app, _db) = setup_test_app();

    let created = send(
        &app,
        Method::POST,
        "/api/rifa",
        Some(json!({"nome": "Bia", "numeros": [5]})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["message"], "Número selecionado com sucesso!");

    let listed = send(&app, Method::GET, "/api/rifa", None).await;
    assert_eq!(listed.body[0]["name"], "Bia");
    assert_eq!(listed.body[0]["numbers"], json!([5]));
}

#[tokio::test]
async fn test_purchased_numbers_are_flattened() {
    let (app, _db) = setup_test_app();

    let empty = send(&app, Method::GET, "/api/getRifas", None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body, json!([]));

    for (name, numbers) in [("Ana", json!([1, 2])), ("Bia", json!([2, 3]))] {
        let response = send(
            &app,
            Method::POST,
            "/api/saveRifa",
            Some(json!({"name": name, "numbers": numbers})),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let purchased = send(&app, Method::GET, "/api/getRifas", None).await;
    assert_eq!(purchased.status, StatusCode::OK);
    // Duplicates across entries are kept
    assert_eq!(numbers_of(&purchased.body), vec![1, 2, 2, 3]);
}

#[tokio::test]
async fn test_summary_reflects_claims() {
    let (app, _db) = setup_test_app();

    send(
        &app,
        Method::POST,
        "/api/saveRifa",
        Some(json!({"name": "Ana", "numbers": [0, 20]})),
    )
    .await;

    let summary = send(&app, Method::GET, "/api/summary", None).await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.body["purchased_count"], 2);
    assert_eq!(summary.body["total_raised"], 100);
    assert_eq!(summary.body["max_number"], 20);
    assert_eq!(numbers_of(&summary.body["available_numbers"]), (1..=19).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_payment_code_does_not_touch_the_store() {
    let (app, db) = setup_test_app();

    let payment = send(&app, Method::GET, "/api/payment", None).await;
    assert_eq!(payment.status, StatusCode::OK);
    assert_eq!(payment.body["code"], TEST_PAYMENT_CODE);
    assert_eq!(db.attempts(), 0);
}

#[tokio::test]
async fn test_invalid_entries_are_rejected() {
    let (app, db) = setup_test_app();

    for body in [
        json!({"name": "   ", "numbers": [1]}),
        json!({"name": "Ana", "numbers": []}),
        json!({"name": "Ana", "numbers": [21]}),
        json!({"numbers": [1]}),
    ] {
        let response = send(&app, Method::POST, "/api/saveRifa", Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["code"], "VALIDATION_ERROR");
    }

    assert_eq!(db.attempts(), 0);
}

#[tokio::test]
async fn test_wrong_method_is_rejected_with_allow_header() {
    let (app, _db) = setup_test_app();

    let response = send(&app, Method::DELETE, "/api/saveRifa", None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers[header::ALLOW], "POST");
    assert_eq!(response.body["message"], "Method DELETE Not Allowed");

    let response = send(&app, Method::GET, "/api/saveRifa", None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body["message"], "Method GET Not Allowed");
}

#[tokio::test]
async fn test_concurrent_requests_share_one_connection() {
    let (app, db) = setup_test_app();

    let responses = futures::future::join_all(
        (0..10).map(|_| send(&app, Method::GET, "/api/getRifas", None)),
    )
    .await;

    for response in responses {
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(db.attempts(), 1);
    assert!(db.is_connected());
}
