//! SQLite connection pools.
//!
//! The marketplace database runs in WAL mode with two pools over the same
//! file: a read-only pool for listings and lookups, and a single-connection
//! pool that serializes every write (registrations, bookings, commission
//! payouts). Migrations run on the writer before any reader connects.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use explorer_types::config::DatabaseConfig;

#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open `database_url` with default pool sizing.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::connect(database_url, &DatabaseConfig::default()).await
    }

    /// Open `database_url`, sizing the reader pool and busy timeout from
    /// `settings`. The `url` field of `settings` is ignored.
    pub async fn connect(database_url: &str, settings: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(settings.busy_timeout_secs));

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(settings.max_readers.max(1))
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(
            database_url,
            max_readers = settings.max_readers,
            "database pool ready"
        );
        Ok(Self { reader, writer })
    }

    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }
}

/// `{data_dir}/explorer.db` as a sqlx URL.
pub fn default_database_url(data_dir: &Path) -> String {
    format!("sqlite://{}", data_dir.join("explorer.db").display())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open(dir: &tempfile::TempDir, settings: &DatabaseConfig) -> DatabasePool {
        let url = format!("{}?mode=rwc", default_database_url(dir.path()));
        DatabasePool::connect(&url, settings).await.unwrap()
    }

    #[tokio::test]
    async fn migrations_create_marketplace_tables() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir, &DatabaseConfig::default()).await;

        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' \
             ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        assert_eq!(names, ["bookings", "commissions", "service_providers", "users"]);
    }

    #[tokio::test]
    async fn writer_uses_wal_and_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir, &DatabaseConfig::default()).await;

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        let fk: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(mode.to_lowercase(), "wal");
        assert_eq!(fk, 1);
    }

    #[tokio::test]
    async fn reader_pool_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DatabaseConfig {
            max_readers: 2,
            ..DatabaseConfig::default()
        };
        let pool = open(&dir, &settings).await;

        let result = sqlx::query("DELETE FROM users").execute(&pool.reader).await;
        assert!(result.is_err());
    }

    #[test]
    fn default_url_points_into_data_dir() {
        let url = default_database_url(Path::new("/tmp/explorer-data"));
        assert_eq!(url, "sqlite:///tmp/explorer-data/explorer.db");
    }
}
