//! SQLite connection management.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::Connection;

use crate::{migrations, StoreError};

/// Thread-safe wrapper around a single rusqlite connection.
///
/// The connection sits behind a mutex because `Connection` is not `Sync`;
/// WAL mode keeps readers from blocking the writer at the file level.
/// Callers reach the connection through [`Database::with_conn`] only.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file, configure pragmas and run all
    /// pending migrations. Parent directories are created as needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| StoreError::Open(format!("{}: {}", path.display(), e)))?;
        let db = Self::configure(conn)?;

        tracing::info!(path = %path.display(), "session database opened");
        Ok(db)
    }

    /// In-memory database for tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| StoreError::Open(format!("failed to set pragmas: {e}")))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run)?;
        Ok(db)
    }

    /// Run a closure against the connection with the lock held.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_schema_is_ready() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_file_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/balcao.db");
        let db = Database::new(&path).unwrap();

        db.with_conn(|conn| {
            let mode: String = conn.query_row("PRAGMA journal_mode", [], |r| r.get(0))?;
            assert_eq!(mode, "wal");
            Ok(())
        })
        .unwrap();
        assert!(path.exists());
    }
}
