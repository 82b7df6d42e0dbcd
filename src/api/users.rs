//! User account API endpoints.
//!
//! - POST `/` - Register a new user with email and password
//! - PUT `/` - Update the authenticated user's email and password

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use super::error::{ApiError, ResultExt};
use crate::auth::{Auth, HasAuthState, hash_password};
use crate::db::{Database, User};
use crate::jwt::AccessTokenCodec;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub codec: Arc<AccessTokenCodec>,
}

impl HasAuthState for UsersState {
    fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/", post(create_user))
        .route("/", put(update_user))
        .with_state(state)
}

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

/// The public shape of a user. The password hash never appears here.
#[derive(Serialize)]
struct UserResponse {
    id: String,
    email: String,
    is_premium: bool,
    created_at: String,
    updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.uuid,
            email: user.email,
            is_premium: user.is_premium,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email cannot be empty"));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    Ok(email)
}

async fn create_user(
    State(state): State<UsersState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = validate_email(&payload.email)?;

    let existing = state
        .db
        .users()
        .get_by_email(email)
        .await
        .db_err("Failed to check email availability")?;
    if existing.is_some() {
        return Err(ApiError::conflict("Email is already registered"));
    }

    let password_hash = hash_password(&payload.password).await.map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to create user")
    })?;

    let uuid = uuid::Uuid::new_v4().to_string();
    state
        .db
        .users()
        .create(&uuid, email, &password_hash)
        .await
        .db_err("Failed to create user")?;

    let user = state
        .db
        .users()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to load created user")?
        .ok_or_else(|| ApiError::internal("Failed to create user"))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn update_user(
    State(state): State<UsersState>,
    Auth(subject): Auth,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = validate_email(&payload.email)?;

    let user = state
        .db
        .users()
        .get_by_uuid(&subject.to_string())
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if let Some(other) = state
        .db
        .users()
        .get_by_email(email)
        .await
        .db_err("Failed to check email availability")?
    {
        if other.id != user.id {
            return Err(ApiError::conflict("Email is already registered"));
        }
    }

    let password_hash = hash_password(&payload.password).await.map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to update user")
    })?;

    state
        .db
        .users()
        .update_credentials(user.id, email, &password_hash)
        .await
        .db_err("Failed to update user")?;

    let updated = state
        .db
        .users()
        .get_by_id(user.id)
        .await
        .db_err("Failed to load updated user")?
        .ok_or_else(|| ApiError::internal("Failed to update user"))?;

    Ok((StatusCode::OK, Json(UserResponse::from(updated))))
}
