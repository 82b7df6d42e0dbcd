//! Tests for the login / refresh / revoke flows and request authorization.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create_test_app, login, post_json, register_user, request_with_bearer};
use tower::ServiceExt;

#[tokio::test]
async fn test_login_returns_token_pair() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;

    let session = login(&app, "a@b.com", "hunter2").await;

    let access = session["token"].as_str().unwrap();
    let refresh = session["refresh_token"].as_str().unwrap();

    assert!(!access.is_empty());
    assert_eq!(refresh.len(), 64);
    assert!(refresh.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(access, refresh);
    assert_eq!(session["email"], "a@b.com");
    assert_eq!(session["is_premium"], false);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;

    let wrong_password = post_json(
        &app,
        "/api/login",
        serde_json::json!({ "email": "a@b.com", "password": "hunter3" }),
    )
    .await;
    let unknown_email = post_json(
        &app,
        "/api/login",
        serde_json::json!({ "email": "nobody@b.com", "password": "hunter2" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Identical bodies: no oracle for which part was wrong.
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_refresh_issues_usable_access_token() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;
    let session = login(&app, "a@b.com", "hunter2").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let response = request_with_bearer(&app, "POST", "/api/refresh", refresh_token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let new_access = body["token"].as_str().unwrap();
    assert!(!new_access.is_empty());

    // The refreshed access token authorizes requests.
    let response = request_with_bearer(
        &app,
        "POST",
        "/api/posts",
        new_access,
        Some(serde_json::json!({ "body": "hello" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_refresh_token_is_reusable_until_revoked() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;
    let session = login(&app, "a@b.com", "hunter2").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    // No rotation on use: the same token keeps working.
    for _ in 0..3 {
        let response =
            request_with_bearer(&app, "POST", "/api/refresh", refresh_token, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_refresh_with_access_token_fails() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;
    let session = login(&app, "a@b.com", "hunter2").await;
    let access_token = session["token"].as_str().unwrap();

    // An access token is not a refresh token; it is unknown to the store.
    let response = request_with_bearer(&app, "POST", "/api/refresh", access_token, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_requires_bearer_header() {
    let (app, _db) = create_test_app().await;

    let missing = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let malformed = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/refresh")
                .header("authorization", "Token abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoked_token_fails_like_unknown() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;
    let session = login(&app, "a@b.com", "hunter2").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let response = request_with_bearer(&app, "POST", "/api/revoke", refresh_token, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let revoked = request_with_bearer(&app, "POST", "/api/refresh", refresh_token, None).await;
    let unknown = request_with_bearer(
        &app,
        "POST",
        "/api/refresh",
        "00000000000000000000000000000000",
        None,
    )
    .await;

    assert_eq!(revoked.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(revoked).await, body_json(unknown).await);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;
    let session = login(&app, "a@b.com", "hunter2").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    for _ in 0..2 {
        let response =
            request_with_bearer(&app, "POST", "/api/revoke", refresh_token, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    // Revoking a token that never existed also succeeds.
    let response = request_with_bearer(&app, "POST", "/api/revoke", "never-issued", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_revoking_one_session_leaves_others_valid() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;

    let first = login(&app, "a@b.com", "hunter2").await;
    let second = login(&app, "a@b.com", "hunter2").await;
    let first_token = first["refresh_token"].as_str().unwrap();
    let second_token = second["refresh_token"].as_str().unwrap();
    assert_ne!(first_token, second_token);

    let response = request_with_bearer(&app, "POST", "/api/revoke", first_token, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let revoked = request_with_bearer(&app, "POST", "/api/refresh", first_token, None).await;
    assert_eq!(revoked.status(), StatusCode::UNAUTHORIZED);

    let live = request_with_bearer(&app, "POST", "/api/refresh", second_token, None).await;
    assert_eq!(live.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_endpoint_rejects_bad_credentials() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "a@b.com", "hunter2").await;

    // No header at all.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/posts")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"body": "hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A token that is not a JWT at all.
    let response = request_with_bearer(
        &app,
        "POST",
        "/api/posts",
        "garbage",
        Some(serde_json::json!({ "body": "hello" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A token signed with a different secret.
    let foreign = warbler::jwt::AccessTokenCodec::new(b"a-completely-different-secret");
    let forged = foreign
        .issue(uuid::Uuid::new_v4(), std::time::Duration::from_secs(3600))
        .unwrap();
    let response = request_with_bearer(
        &app,
        "POST",
        "/api/posts",
        &forged,
        Some(serde_json::json!({ "body": "hello" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_healthz() {
    let (app, _db) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
