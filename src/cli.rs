//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use clap::Parser;
use tracing::{error, info};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Deployment platform. The destructive admin reset endpoint only works on
/// `dev`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Platform {
    Dev,
    #[default]
    Production,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Warbler", about = "Short text posts with token authentication")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "warbler.db")]
    pub database: String,

    /// Deployment platform
    #[arg(long, value_enum, default_value = "production")]
    pub platform: Platform,

    /// Path to file containing the JWT signing secret. Prefer using the
    /// JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Path to file containing the webhook API key. Prefer using the
    /// WEBHOOK_API_KEY env var instead
    #[arg(long)]
    pub webhook_key_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Read a secret from an environment variable or a file, clearing the
/// environment variable after reading. Returns None and logs an error if the
/// secret cannot be loaded.
fn load_secret(env_var: &str, file: Option<&str>, flag: &str) -> Option<String> {
    if let Ok(secret) = std::env::var(env_var) {
        // Clear the environment variable to prevent leaking.
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var(env_var) };
        return Some(secret);
    }

    if let Some(path) = file {
        return match std::fs::read_to_string(path) {
            Ok(content) => Some(content.trim().to_string()),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read secret file");
                None
            }
        };
    }

    error!(
        "{} is required. Set the {} environment variable (recommended) or use {}",
        env_var, env_var, flag
    );
    None
}

/// Load the JWT signing secret. Its absence is a fatal startup condition.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = load_secret("JWT_SECRET", jwt_secret_file, "--jwt-secret-file")?;

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Load the webhook API key. Its absence is a fatal startup condition.
pub fn load_webhook_key(webhook_key_file: Option<&str>) -> Option<String> {
    let key = load_secret("WEBHOOK_API_KEY", webhook_key_file, "--webhook-key-file")?;

    if key.is_empty() {
        error!("Webhook API key must not be empty");
        return None;
    }

    Some(key)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: String,
    webhook_key: String,
    platform: Platform,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        webhook_key,
        platform,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
