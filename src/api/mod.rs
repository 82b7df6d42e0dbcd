mod admin;
mod error;
mod posts;
mod tokens;
mod users;
mod webhooks;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::auth::SessionService;
use crate::cli::Platform;
use crate::db::Database;
use crate::jwt::AccessTokenCodec;

/// Create the API router.
pub fn create_api_router(
    db: Database,
    codec: Arc<AccessTokenCodec>,
    webhook_key: Arc<String>,
    platform: Platform,
) -> Router {
    let sessions = SessionService::new(db.clone(), codec.clone());

    let users_state = users::UsersState {
        db: db.clone(),
        codec: codec.clone(),
    };

    let posts_state = posts::PostsState {
        db: db.clone(),
        codec,
    };

    let tokens_state = tokens::TokensState { sessions };

    let webhooks_state = webhooks::WebhooksState {
        db: db.clone(),
        webhook_key,
    };

    let admin_state = admin::AdminState { db, platform };

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/users", users::router(users_state))
        .nest("/posts", posts::router(posts_state))
        .nest("/webhooks", webhooks::router(webhooks_state))
        .nest("/admin", admin::router(admin_state))
        .merge(tokens::router(tokens_state))
}

/// Readiness probe.
async fn healthz() -> &'static str {
    "OK"
}
