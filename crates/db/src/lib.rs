//! Document storage for the QTrace admin console.
//!
//! - [`store`] -- the [`DocumentStore`](store::DocumentStore) seam and its
//!   Postgres and in-memory backends.
//! - [`models`] -- the document shapes of each collection.
//! - [`repositories`] -- typed access on top of the store.

use sqlx::postgres::PgPoolOptions;

pub mod collections;
pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
