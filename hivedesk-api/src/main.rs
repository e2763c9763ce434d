//! # HiveDesk API Server
//!
//! The HiveDesk API server: organizations with role-based memberships, a
//! CRM contact list, a task tracker, and chatrooms whose new messages are
//! announced on an external real-time channel.
//!
//! ## Startup sequence
//!
//! 1. Initialize tracing
//! 2. Load configuration from the environment
//! 3. Build the database pool and run migrations
//! 4. Connect the real-time channel publisher
//! 5. Serve until ctrl-c, then close the pool
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p hivedesk-api
//! ```

use hivedesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use hivedesk_shared::db::migrations::run_migrations;
use hivedesk_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use hivedesk_shared::realtime::{MessagePublisher, RedisClient, RedisConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hivedesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "HiveDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let redis = RedisClient::new(RedisConfig::from_url(&config.redis.url)).await?;
    let publisher = MessagePublisher::new(redis);

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), publisher, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing...");
    close_pool(pool).await;

    Ok(())
}

/// Resolves when ctrl-c is received
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c");
}
