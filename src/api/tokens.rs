//! Session token API endpoints.
//!
//! - POST `/login` - Exchange email+password for an access/refresh token pair
//! - POST `/refresh` - Exchange a refresh token for a new access token
//! - POST `/revoke` - Revoke a refresh token

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::error::ApiError;
use crate::auth::{SessionError, SessionService, bearer_token};

#[derive(Clone)]
pub struct TokensState {
    pub sessions: SessionService,
}

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/revoke", post(revoke))
        .with_state(state)
}

fn session_err(e: SessionError) -> ApiError {
    match e {
        SessionError::InvalidCredentials => {
            ApiError::unauthorized("Incorrect email or password")
        }
        SessionError::InvalidRefreshToken => {
            ApiError::unauthorized("Invalid or expired refresh token")
        }
        other => {
            error!("Session operation failed: {}", other);
            ApiError::internal("Internal error")
        }
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    id: String,
    email: String,
    is_premium: bool,
    token: String,
    refresh_token: String,
}

async fn login(
    State(state): State<TokensState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .login(&payload.email, &payload.password)
        .await
        .map_err(session_err)?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            id: session.user.uuid,
            email: session.user.email,
            is_premium: session.user.is_premium,
            token: session.access_token,
            refresh_token: session.refresh_token,
        }),
    ))
}

#[derive(Serialize)]
struct RefreshResponse {
    token: String,
}

async fn refresh(
    State(state): State<TokensState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_token =
        bearer_token(&headers).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let token = state
        .sessions
        .refresh(refresh_token)
        .await
        .map_err(session_err)?;

    Ok((StatusCode::OK, Json(RefreshResponse { token })))
}

async fn revoke(
    State(state): State<TokensState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_token =
        bearer_token(&headers).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    state
        .sessions
        .revoke(refresh_token)
        .await
        .map_err(session_err)?;

    Ok(StatusCode::NO_CONTENT)
}
