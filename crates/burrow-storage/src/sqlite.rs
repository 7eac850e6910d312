use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use burrow_core::{ReadRepository, Repository, Result, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, trace};
use typed_builder::TypedBuilder;

const OP_OPEN: &str = "storage.sqlite.open";
const OP_SAVE: &str = "storage.sqlite.save";
const OP_GET: &str = "storage.sqlite.get";
const OP_DELETE: &str = "storage.sqlite.delete";

const SCHEMA: &str = include_str!("../ddl/sqlite/url.sql");

/// Connection settings for [`SqliteRepository`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SqliteConfig {
    #[builder(default = 5)]
    max_connections: u32,
    /// How long a writer waits on a locked database before failing.
    #[builder(default = Duration::from_secs(5))]
    busy_timeout: Duration,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// SQLite implementation of the repository contract.
///
/// Every operation is a single statement against the `url` table, so
/// atomicity and writer serialization come from SQLite itself. Ids come
/// from `AUTOINCREMENT` and are never handed out twice, even after the
/// newest row is deleted.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens the database file at `path` with default settings, creating it
    /// if absent, and ensures the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, SqliteConfig::default()).await
    }

    /// Like [`SqliteRepository::open`], with explicit connection settings.
    ///
    /// In-memory and temporary locations (`:memory:`, `file::memory:`, the
    /// empty path) are private to each connection, so they get the
    /// single-connection setup of [`SqliteRepository::in_memory`].
    pub async fn open_with(path: impl AsRef<Path>, config: SqliteConfig) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening sqlite url store");

        if is_in_memory(path) {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|err| StorageError::failure(OP_OPEN, err.to_string()))?;

        Self::with_pool(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// The pool holds exactly one connection that is never recycled, so the
    /// data lives as long as the repository (and its clones).
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|err| StorageError::failure(OP_OPEN, err.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|err| StorageError::failure(OP_OPEN, err.to_string()))?;

        Self::with_pool(pool).await
    }

    /// Creates a repository from an existing pool, creating the schema if
    /// it is not there yet.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|err| StorageError::failure(OP_OPEN, err.to_string()))?;

        debug!("sqlite url schema ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection. Later operations fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(path: &Path) -> bool {
    let Some(location) = path.to_str() else {
        return false;
    };

    location.is_empty()
        || location == ":memory:"
        || location.starts_with("file::memory:")
        || (location.starts_with("file:") && location.contains("mode=memory"))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

/// Maps a raw sqlx error into the storage error taxonomy.
///
/// This is the only place that looks inside engine errors: a unique
/// constraint violation means the alias is taken, a missing row means the
/// alias is unknown, anything else is an opaque failure of `op`.
pub(crate) fn classify(op: &'static str, alias: &str, err: sqlx::Error) -> StorageError {
    if is_unique_violation(&err) {
        return StorageError::AliasExists(alias.to_owned());
    }

    match err {
        sqlx::Error::RowNotFound => StorageError::NotFound(alias.to_owned()),
        err => StorageError::failure(op, err.to_string()),
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, alias: &str) -> Result<String> {
        trace!(alias = %alias, "looking up alias");

        sqlx::query_scalar::<_, String>("SELECT url FROM url WHERE alias = ?")
            .bind(alias)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| classify(OP_GET, alias, err))
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn save(&self, url: &str, alias: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO url (url, alias) VALUES (?, ?)")
            .bind(url)
            .bind(alias)
            .execute(&self.pool)
            .await
            .map_err(|err| classify(OP_SAVE, alias, err))?;

        let id = result.last_insert_rowid();
        debug!(alias = %alias, id, "saved url");
        Ok(id)
    }

    async fn delete(&self, alias: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM url WHERE alias = ?")
            .bind(alias)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::failure(OP_DELETE, err.to_string()))?;

        debug!(alias = %alias, removed = result.rows_affected() > 0, "deleted url");
        Ok(())
    }
}
