//! Durable state for the balcao attendant.
//!
//! Three stores over one SQLite database: per-user sessions (read/upsert/
//! delete), and append-only ticket and rating sinks. Each store is exposed
//! as an async trait so the engine can run against in-memory doubles in
//! tests; the SQLite implementations hop through `spawn_blocking` because
//! rusqlite is synchronous.

pub mod db;
pub mod migrations;
pub mod ratings;
pub mod sessions;
pub mod tickets;

pub use db::Database;
pub use ratings::{InMemoryRatingSink, RatingSink, SqliteRatingSink};
pub use sessions::{InMemorySessionStore, SessionStore, SqliteSessionStore};
pub use tickets::{InMemoryTicketSink, SqliteTicketSink, TicketSink};

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open store: {0}")]
    Open(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A persisted session names a stage outside the known set. Carries
    /// the stored display name so the engine can still address the user
    /// while recovering.
    #[error("session for {user_id} has unknown stage {value:?}")]
    UnknownStage {
        user_id: String,
        value: String,
        display_name: String,
    },

    #[error("storage task failed: {0}")]
    Task(String),
}

/// The three stores bundled together, sharing one database handle.
pub struct Stores {
    pub sessions: Arc<dyn SessionStore>,
    pub tickets: Arc<dyn TicketSink>,
    pub ratings: Arc<dyn RatingSink>,
}

/// Open (or create) the database at `path` and build all stores.
///
/// Runs migrations; any failure here must abort startup.
pub fn open(path: &Path) -> Result<Stores, StoreError> {
    let db = Arc::new(Database::new(path)?);
    Ok(Stores {
        sessions: Arc::new(SqliteSessionStore::new(db.clone())),
        tickets: Arc::new(SqliteTicketSink::new(db.clone())),
        ratings: Arc::new(SqliteRatingSink::new(db)),
    })
}

/// In-memory variant of [`open`] for tests.
pub fn open_in_memory() -> Result<Stores, StoreError> {
    let db = Arc::new(Database::in_memory()?);
    Ok(Stores {
        sessions: Arc::new(SqliteSessionStore::new(db.clone())),
        tickets: Arc::new(SqliteTicketSink::new(db.clone())),
        ratings: Arc::new(SqliteRatingSink::new(db)),
    })
}
