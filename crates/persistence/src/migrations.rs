//! Schema migrations.

use rusqlite::Connection;

use crate::StoreError;

/// Apply all pending migrations.
///
/// Idempotent; versions already recorded in `schema_migrations` are
/// skipped.
pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| StoreError::Migration(format!("migrations table: {e}")))?;

    let current: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::Migration(format!("version query: {e}")))?;

    if current < 1 {
        apply_v1(conn)?;
        tracing::info!("applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: sessions plus the two append-only sinks.
fn apply_v1(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sessions (
            user_id       TEXT PRIMARY KEY NOT NULL,
            stage         TEXT NOT NULL,
            display_name  TEXT NOT NULL DEFAULT '',
            updated_at    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_updated_at
            ON sessions (updated_at ASC);

        CREATE TABLE IF NOT EXISTS tickets (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       TEXT NOT NULL,
            display_name  TEXT NOT NULL DEFAULT '',
            product       TEXT NOT NULL,
            description   TEXT NOT NULL,
            status        TEXT NOT NULL DEFAULT 'open'
                          CHECK (status IN ('open', 'in_progress', 'resolved', 'closed')),
            created_at    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tickets_user
            ON tickets (user_id, created_at DESC);

        CREATE TABLE IF NOT EXISTS ratings (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       TEXT NOT NULL,
            display_name  TEXT NOT NULL DEFAULT '',
            feedback      TEXT NOT NULL,
            created_at    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ratings_user
            ON ratings (user_id, created_at DESC);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| StoreError::Migration(format!("v1: {e}")))?;

    Ok(())
}
