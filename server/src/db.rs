//! Database pool setup.
//!
//! The role and permission tables themselves are owned by the external
//! data store; this service only queries them.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Create a `PostgreSQL` connection pool.
pub async fn create_pool(database_url: &str) -> sqlx::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
