/// Database access layer
///
/// This module provides the PostgreSQL connection pool and migration
/// utilities used by the API server.
///
/// - `pool`: Connection pool creation, health checks, graceful shutdown
/// - `migrations`: Migration runner built on `sqlx::migrate!`

pub mod migrations;
pub mod pool;

pub use pool::{close_pool, create_pool, health_check, DatabaseConfig};
