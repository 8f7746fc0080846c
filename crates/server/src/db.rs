use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database '{url}': {source} (check if data directory is writable)")]
    Connection { url: String, source: sqlx::Error },
    #[error("Failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, DatabaseError> {
    let connection_error = |e| DatabaseError::Connection {
        url: database_url.to_string(),
        source: e,
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(connection_error)?;

    // WAL lets list queries run while a sync batch is being written
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(connection_error)?;

    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await
        .map_err(connection_error)?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    Ok(pool)
}

/// In-memory database with the schema applied.
///
/// Every SQLite `:memory:` connection is a separate database, so the pool is
/// pinned to a single connection that is never recycled.
pub async fn create_memory_pool() -> Result<SqlitePool, DatabaseError> {
    let url = "sqlite::memory:";
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(url)
        .await
        .map_err(|e| DatabaseError::Connection {
            url: url.to_string(),
            source: e,
        })?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    Ok(pool)
}
