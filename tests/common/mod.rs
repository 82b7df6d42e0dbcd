#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use warbler::cli::Platform;
use warbler::db::Database;
use warbler::{ServerConfig, create_app};

pub const TEST_JWT_SECRET: &[u8] = b"test-jwt-secret-long-enough-to-pass";
pub const TEST_WEBHOOK_KEY: &str = "test-webhook-key";

/// Create a test app and its backing database.
pub async fn create_test_app() -> (axum::Router, Database) {
    create_test_app_on(Platform::Production).await
}

pub async fn create_test_app_on(platform: Platform) -> (axum::Router, Database) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_JWT_SECRET.to_vec(),
        webhook_key: TEST_WEBHOOK_KEY.to_string(),
        platform,
    };
    (create_app(&config), db)
}

/// Send a JSON POST without authentication.
pub async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Send a JSON request with a bearer token.
pub async fn request_with_bearer(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user through the API and return the response body.
pub async fn register_user(app: &axum::Router, email: &str, password: &str) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/users",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Log in through the API and return the response body
/// (contains `token` and `refresh_token`).
pub async fn login(app: &axum::Router, email: &str, password: &str) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
