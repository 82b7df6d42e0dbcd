//! Admin API endpoints.
//!
//! - POST `/reset` - Wipe all users, posts, and tokens (dev platform only)

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde::Serialize;

use super::error::{ApiError, ResultExt};
use crate::cli::Platform;
use crate::db::Database;

#[derive(Clone)]
pub struct AdminState {
    pub db: Database,
    pub platform: Platform,
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/reset", post(reset))
        .with_state(state)
}

#[derive(Serialize)]
struct ResetResponse {
    users_deleted: u64,
}

async fn reset(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    if state.platform != Platform::Dev {
        return Err(ApiError::forbidden(
            "Reset is only allowed on the dev platform",
        ));
    }

    let users_deleted = state
        .db
        .users()
        .delete_all()
        .await
        .db_err("Failed to reset database")?;

    Ok((StatusCode::OK, Json(ResetResponse { users_deleted })))
}
