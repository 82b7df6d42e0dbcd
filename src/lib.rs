pub mod api;
pub mod auth;
pub mod cleanup;
pub mod cli;
pub mod db;
pub mod jwt;

use api::create_api_router;
use axum::Router;
use cli::Platform;
use db::Database;
use jwt::AccessTokenCodec;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Secret for signing access tokens
    pub jwt_secret: Vec<u8>,
    /// Pre-shared key the webhook collaborator authenticates with
    pub webhook_key: String,
    /// Deployment platform (gates the destructive admin reset)
    pub platform: Platform,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let codec = Arc::new(AccessTokenCodec::new(&config.jwt_secret));
    let webhook_key = Arc::new(config.webhook_key.clone());

    let api_router = create_api_router(
        config.db.clone(),
        codec,
        webhook_key,
        config.platform,
    );

    Router::new().nest("/api", api_router)
}

/// Run the retention sweep once and spawn the background scheduler.
/// Call this before starting the server.
pub async fn init_cleanup(db: &Database) {
    cleanup::run_cleanup(db).await;
    cleanup::spawn_cleanup_scheduler(db.clone());
}

/// Run the server on the given listener. This function blocks until the server exits.
/// Call `init_cleanup` before this to run the sweep on startup.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
