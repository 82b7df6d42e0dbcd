//! Tests for the dev-only admin reset.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create_test_app, create_test_app_on, post_json, register_user};
use tower::ServiceExt;
use warbler::cli::Platform;

async fn reset(app: &axum::Router) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/reset")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_reset_forbidden_in_production() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;

    let response = reset(&app).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The user survives.
    let response = post_json(
        &app,
        "/api/login",
        serde_json::json!({ "email": "a@b.com", "password": "hunter2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reset_wipes_users_on_dev() {
    let (app, _db) = create_test_app_on(Platform::Dev).await;
    register_user(&app, "a@b.com", "hunter2").await;

    let response = reset(&app).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["users_deleted"], 1);

    let response = post_json(
        &app,
        "/api/login",
        serde_json::json!({ "email": "a@b.com", "password": "hunter2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
