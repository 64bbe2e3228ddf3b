use goto_core::error::{Result, StorageError};
use goto_core::{Key, RedirectStore};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use tracing::{debug, trace};

const CREATE_REDIRECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS redirects (
    key VARCHAR(32) NOT NULL,
    url VARCHAR(255) NOT NULL
)
"#;

/// SQLite implementation of the redirect store.
///
/// The table carries no primary key; uniqueness of `key` is maintained by
/// [`RedirectStore::save`], which deletes and re-inserts inside a single
/// transaction. The wrapped connection is never shared: whoever owns this
/// value is the only caller the database ever sees.
#[derive(Debug)]
pub struct SqliteRedirectStore {
    conn: Connection,
}

impl SqliteRedirectStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// This does not create the schema; call [`RedirectStore::initialize`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StorageError::Open(format!("cannot open '{}': {e}", path.display()))
        })?;
        debug!(path = %path.display(), "opened sqlite redirect store");
        Ok(Self { conn })
    }

    /// Opens a private in-memory database.
    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Open(format!("cannot open in-memory database: {e}")))?;
        Ok(Self { conn })
    }
}

fn map_sqlite_error(err: rusqlite::Error) -> StorageError {
    let message = err.to_string();

    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DiskFull
                    | ErrorCode::ReadOnly
            ) =>
        {
            StorageError::Unavailable(message)
        }
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::InvalidColumnIndex(..)
        | rusqlite::Error::InvalidColumnName(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::Utf8Error(..) => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

impl RedirectStore for SqliteRedirectStore {
    fn initialize(&mut self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_REDIRECTS_TABLE)
            .map_err(|e| StorageError::Schema(e.to_string()))?;
        debug!("ensured redirects table");
        Ok(())
    }

    fn lookup(&self, key: &Key) -> Result<Option<String>> {
        trace!(key = %key, "sqlite lookup");

        let mut stmt = self
            .conn
            .prepare_cached("SELECT url FROM redirects WHERE key = ?1 LIMIT 1")
            .map_err(map_sqlite_error)?;

        stmt.query_row(params![key.as_str()], |row| row.get::<_, String>(0))
            .optional()
            .map_err(map_sqlite_error)
    }

    fn save(&mut self, key: &Key, url: &str) -> Result<()> {
        trace!(key = %key, "sqlite save");

        // Dropping the transaction without commit rolls back, so a failed
        // insert never leaves the key deleted.
        let tx = self.conn.transaction().map_err(map_sqlite_error)?;
        tx.execute("DELETE FROM redirects WHERE key = ?1", params![key.as_str()])
            .map_err(map_sqlite_error)?;
        tx.execute(
            "INSERT INTO redirects (key, url) VALUES (?1, ?2)",
            params![key.as_str(), url],
        )
        .map_err(map_sqlite_error)?;
        tx.commit().map_err(map_sqlite_error)
    }
}
