//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and connection
//! configuration for SQLite databases.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const BUSY_TIMEOUT: &str = "PRAGMA busy_timeout=5000";

/// Applies the connection pragmas to every pooled connection.
///
/// Several pooled connections may write the same file, so writers wait on
/// the lock instead of failing with `SQLITE_BUSY`.
#[derive(Debug, Clone, Copy)]
struct Pragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for Pragmas {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        diesel::sql_query(BUSY_TIMEOUT)
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(5)
        .connection_customizer(Box::new(Pragmas))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Connection(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    fn file_pool() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.db");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        (dir, pool)
    }

    fn table_names(pool: &DbPool) -> Vec<String> {
        let mut conn = pool.get().unwrap();
        diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect()
    }

    #[test]
    fn create_pool_with_memory_db() {
        let pool = create_pool(":memory:").unwrap();
        assert!(pool.get().is_ok());
    }

    #[test]
    fn run_migrations_creates_tables() {
        let (_dir, pool) = file_pool();
        run_migrations(&pool).unwrap();

        assert_eq!(
            table_names(&pool),
            vec!["claims", "ingredients", "recipes", "stores"]
        );
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let (_dir, pool) = file_pool();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();

        assert_eq!(table_names(&pool).len(), 4);
    }

    #[test]
    fn pool_respects_max_size() {
        let pool = create_pool(":memory:").unwrap();
        let connections: Vec<_> = (0..5).map(|_| pool.get().unwrap()).collect();
        assert_eq!(pool.state().connections, 5);
        drop(connections);
    }
}
