//! Full-router integration tests: raw HTTP requests through every layer.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use fintrack::db::repositories::LocalRepository;
use fintrack::db::repository::FullRepository;
use fintrack::http::{create_router, AppState};

fn app() -> Router {
    let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repo, "test"))
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

async fn create_user(app: &Router, email: &str) -> Value {
    let (status, _, body) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({
            "name": "Ana",
            "email": email,
            "passwordHash": "0123456789"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_category(app: &Router, user_id: &str, name: &str) -> Value {
    let (status, _, body) = send(
        app,
        "POST",
        &format!("/api/users/{user_id}/expense-categories"),
        Some(json!({"name": name, "color": "#ef4444", "icon": "utensils"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

// ==================== Health & plumbing ====================

#[tokio::test]
async fn health_reports_environment_and_timestamp() {
    let app = app();
    let (status, headers, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert!(body["timestamp"].is_string());
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn every_response_carries_a_fresh_request_id() {
    let app = app();
    let (_, first, _) = send(&app, "GET", "/api/health", None).await;
    let (_, second, _) = send(&app, "GET", "/api/health", None).await;
    assert_ne!(first["x-request-id"], second["x-request-id"]);
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let app = app();
    let (status, headers, body) = send(&app, "GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found: GET /api/nope");
    // Error bodies echo the request id from the header.
    assert_eq!(
        body["requestId"].as_str().unwrap(),
        headers["x-request-id"].to_str().unwrap()
    );
}

// ==================== Users ====================

#[tokio::test]
async fn signup_normalizes_and_strips_the_credential_hash() {
    let app = app();
    let (status, _, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "name": "Ana",
            "email": "ANA@x.com",
            "passwordHash": "0123456789"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ana@x.com");
    assert_eq!(body["defaultCurrency"], "EUR");
    assert!(body.get("passwordHash").is_none());
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn duplicate_signup_is_a_409() {
    let app = app();
    create_user(&app, "ana@x.com").await;
    let (status, _, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "name": "Ana",
            "email": "ana@x.com",
            "passwordHash": "0123456789"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn malformed_user_id_is_a_field_pathed_400() {
    let app = app();
    let (status, headers, body) = send(&app, "GET", "/api/users/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["path"], "userId");
    assert_eq!(
        body["requestId"].as_str().unwrap(),
        headers["x-request-id"].to_str().unwrap()
    );
}

#[tokio::test]
async fn empty_patch_body_is_rejected() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let (status, _, body) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", user["id"].as_str().unwrap()),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["path"], "body");
}

#[tokio::test]
async fn pagination_bounds_are_enforced_not_clamped() {
    let app = app();
    let (status, _, body) = send(&app, "GET", "/api/users?take=101", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["path"], "take");
}

#[tokio::test]
async fn user_list_honors_take() {
    let app = app();
    for i in 0..3 {
        create_user(&app, &format!("user{i}@x.com")).await;
    }
    let (status, _, body) = send(&app, "GET", "/api/users?take=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_returns_the_removed_user() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let path = format!("/api/users/{}", user["id"].as_str().unwrap());

    let (status, _, body) = send(&app, "DELETE", &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user["id"]);

    let (status, _, _) = send(&app, "GET", &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ==================== Expense categories ====================

#[tokio::test]
async fn category_ids_do_not_leak_across_users() {
    let app = app();
    let ana = create_user(&app, "ana@x.com").await;
    let bea = create_user(&app, "bea@x.com").await;
    let category = create_category(&app, ana["id"].as_str().unwrap(), "Food").await;

    let (status, _, _) = send(
        &app,
        "GET",
        &format!(
            "/api/users/{}/expense-categories/{}",
            bea["id"].as_str().unwrap(),
            category["id"].as_str().unwrap()
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_category_name_is_a_409() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let user_id = user["id"].as_str().unwrap();
    create_category(&app, user_id, "Food").await;

    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/api/users/{user_id}/expense-categories"),
        Some(json!({"name": "Food"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ==================== Transactions ====================

#[tokio::test]
async fn expense_without_category_names_the_offending_field() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/users/{}/transactions", user["id"].as_str().unwrap()),
        Some(json!({
            "type": "EXPENSE",
            "amount": 10,
            "transactionDate": "2024-03-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["path"], "categoryId");
}

#[tokio::test]
async fn amounts_round_trip_as_exact_decimal_strings() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let user_id = user["id"].as_str().unwrap();
    let category = create_category(&app, user_id, "Food").await;

    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/users/{user_id}/transactions"),
        Some(json!({
            "type": "EXPENSE",
            "amount": 12.50,
            "transactionDate": "2024-03-01T00:00:00Z",
            "categoryId": category["id"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], "12.5");
    assert_eq!(body["type"], "EXPENSE");
    assert_eq!(body["category"]["name"], "Food");
}

#[tokio::test]
async fn switching_to_income_nulls_the_category() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let user_id = user["id"].as_str().unwrap();
    let category = create_category(&app, user_id, "Food").await;

    let (_, _, transaction) = send(
        &app,
        "POST",
        &format!("/api/users/{user_id}/transactions"),
        Some(json!({
            "type": "EXPENSE",
            "amount": "42.00",
            "transactionDate": "2024-03-01T00:00:00Z",
            "categoryId": category["id"]
        })),
    )
    .await;

    let (status, _, body) = send(
        &app,
        "PATCH",
        &format!(
            "/api/users/{user_id}/transactions/{}",
            transaction["id"].as_str().unwrap()
        ),
        Some(json!({"type": "INCOME"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "INCOME");
    assert_eq!(body["categoryId"], Value::Null);
    assert_eq!(body["category"], Value::Null);
}

#[tokio::test]
async fn reads_are_idempotent() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let user_id = user["id"].as_str().unwrap();
    let category = create_category(&app, user_id, "Food").await;

    let (_, _, transaction) = send(
        &app,
        "POST",
        &format!("/api/users/{user_id}/transactions"),
        Some(json!({
            "type": "EXPENSE",
            "amount": 10,
            "transactionDate": "2024-03-01T00:00:00Z",
            "categoryId": category["id"]
        })),
    )
    .await;

    let path = format!(
        "/api/users/{user_id}/transactions/{}",
        transaction["id"].as_str().unwrap()
    );
    let (_, _, first) = send(&app, "GET", &path, None).await;
    let (_, _, second) = send(&app, "GET", &path, None).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn transaction_list_filters_by_date_range() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let user_id = user["id"].as_str().unwrap();

    for date in ["2024-01-15T00:00:00Z", "2024-02-15T00:00:00Z", "2024-03-15T00:00:00Z"] {
        let (status, _, _) = send(
            &app,
            "POST",
            &format!("/api/users/{user_id}/transactions"),
            Some(json!({
                "type": "INCOME",
                "amount": 100,
                "transactionDate": date
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, body) = send(
        &app,
        "GET",
        &format!("/api/users/{user_id}/transactions?from=2024-02-01&to=2024-02-28"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0]["transactionDate"]
        .as_str()
        .unwrap()
        .starts_with("2024-02-15"));
}

#[tokio::test]
async fn inverted_filter_ranges_are_field_pathed_errors() {
    let app = app();
    let user = create_user(&app, "ana@x.com").await;
    let user_id = user["id"].as_str().unwrap();

    let (status, _, body) = send(
        &app,
        "GET",
        &format!("/api/users/{user_id}/transactions?minAmount=100&maxAmount=5"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["path"], "minAmount");
}
