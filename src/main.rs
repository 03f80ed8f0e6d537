//! Digital Money House - Wallet Service Entry Point
//!
//! This is a REST API server for a digital wallet. Users register, log in,
//! register cards, deposit money from them, transfer money to other accounts
//! and browse their activity.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: HS256 JWT checked by a gateway middleware, argon2 password hashes
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Initialize logging
//! 3. Create database connection pool
//! 4. Run database migrations
//! 5. Load the alias dictionary
//! 6. Build HTTP router with routes and middleware
//! 7. Start server on configured port

mod auth;
mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;
mod validation;

use tracing_subscriber::EnvFilter;

use crate::{
    auth::{JwtKeys, RevokedTokens},
    config::{Config, LogFormat},
    services::identifiers::AliasGenerator,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let aliases = AliasGenerator::load(config.alias_words_path.as_deref())?;
    tracing::info!(words = aliases.word_count(), "Alias dictionary loaded");

    let state = AppState {
        pool,
        jwt: JwtKeys::from_config(&config),
        revoked: RevokedTokens::new(),
        aliases,
    };
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Reads RUST_LOG (defaults to "info"); `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
