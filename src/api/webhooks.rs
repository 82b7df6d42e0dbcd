//! Webhook receiver for the external payments collaborator.
//!
//! - POST `/premium` - Upgrade a user to premium on a `user.upgraded` event
//!
//! Authenticated by a pre-shared static key in `Authorization: ApiKey <key>`,
//! not by session tokens.

use axum::{
    Json, Router, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::auth::api_key;
use crate::db::Database;

#[derive(Clone)]
pub struct WebhooksState {
    pub db: Database,
    pub webhook_key: Arc<String>,
}

pub fn router(state: WebhooksState) -> Router {
    Router::new()
        .route("/premium", post(premium_event))
        .with_state(state)
}

#[derive(Deserialize)]
struct WebhookEvent {
    event: String,
    data: WebhookData,
}

#[derive(Deserialize)]
struct WebhookData {
    user_id: String,
}

async fn premium_event(
    State(state): State<WebhooksState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookEvent>,
) -> Result<impl IntoResponse, ApiError> {
    let key = api_key(&headers).map_err(|e| ApiError::unauthorized(e.to_string()))?;
    if key != state.webhook_key.as_str() {
        return Err(ApiError::unauthorized("Invalid API key"));
    }

    // Unrecognized events are acknowledged without action.
    if payload.event != "user.upgraded" {
        return Ok(StatusCode::NO_CONTENT);
    }

    if uuid::Uuid::parse_str(&payload.data.user_id).is_err() {
        return Err(ApiError::bad_request("Invalid user ID"));
    }

    let upgraded = state
        .db
        .users()
        .set_premium(&payload.data.user_id)
        .await
        .db_err("Failed to upgrade user")?;

    if !upgraded {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
