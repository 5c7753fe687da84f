//! Per-user session storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rusqlite::{params, OptionalExtension};

use balcao_core::{SessionRecord, Stage};

use crate::{Database, StoreError};

/// Conversation-session persistence.
///
/// `upsert` is last-writer-wins on `user_id` and always refreshes the
/// timestamp; `delete` is idempotent. A stored stage value outside the
/// known set is surfaced as [`StoreError::UnknownStage`] instead of being
/// coerced, so the engine can run its recovery branch.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<SessionRecord>, StoreError>;

    async fn upsert(
        &self,
        user_id: &str,
        stage: Stage,
        display_name: &str,
    ) -> Result<(), StoreError>;

    async fn delete(&self, user_id: &str) -> Result<(), StoreError>;

    /// Remove sessions idle for longer than `max_age`; returns how many
    /// were removed. Users swept here simply restart as new users.
    async fn purge_idle(&self, max_age: Duration) -> Result<u64, StoreError>;
}

/// SQLite-backed implementation.
pub struct SqliteSessionStore {
    db: Arc<Database>,
}

impl SqliteSessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn row_to_session(
    user_id: String,
    stage_text: String,
    display_name: String,
    updated_ms: i64,
) -> Result<SessionRecord, StoreError> {
    let stage: Stage = stage_text
        .parse()
        .map_err(|_| StoreError::UnknownStage {
            user_id: user_id.clone(),
            value: stage_text,
            display_name: display_name.clone(),
        })?;

    Ok(SessionRecord {
        user_id,
        stage,
        display_name,
        updated_at: DateTime::from_timestamp_millis(updated_ms).unwrap_or_else(Utc::now),
    })
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let db = self.db.clone();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| {
                let row = conn
                    .query_row(
                        "SELECT user_id, stage, display_name, updated_at
                         FROM sessions WHERE user_id = ?1",
                        params![user_id],
                        |row| {
                            Ok((
                                row.get::<_, String>(0)?,
                                row.get::<_, String>(1)?,
                                row.get::<_, String>(2)?,
                                row.get::<_, i64>(3)?,
                            ))
                        },
                    )
                    .optional()?;

                row.map(|(id, stage, name, ms)| row_to_session(id, stage, name, ms))
                    .transpose()
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn upsert(
        &self,
        user_id: &str,
        stage: Stage,
        display_name: &str,
    ) -> Result<(), StoreError> {
        let db = self.db.clone();
        let user_id = user_id.to_string();
        let display_name = display_name.to_string();
        let now_ms = Utc::now().timestamp_millis();

        tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO sessions (user_id, stage, display_name, updated_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(user_id) DO UPDATE SET
                        stage = excluded.stage,
                        display_name = excluded.display_name,
                        updated_at = excluded.updated_at",
                    params![user_id, stage.as_str(), display_name, now_ms],
                )?;
                tracing::debug!(user_id = %user_id, stage = %stage, "session upserted");
                Ok(())
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        let db = self.db.clone();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| {
                conn.execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])?;
                Ok(())
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn purge_idle(&self, max_age: Duration) -> Result<u64, StoreError> {
        let db = self.db.clone();
        let cutoff_ms = (Utc::now() - max_age).timestamp_millis();

        tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| {
                let removed = conn.execute(
                    "DELETE FROM sessions WHERE updated_at < ?1",
                    params![cutoff_ms],
                )?;
                Ok(removed as u64)
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Map-backed store for tests.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.sessions.read().get(user_id).cloned())
    }

    async fn upsert(
        &self,
        user_id: &str,
        stage: Stage,
        display_name: &str,
    ) -> Result<(), StoreError> {
        self.sessions.write().insert(
            user_id.to_string(),
            SessionRecord {
                user_id: user_id.to_string(),
                stage,
                display_name: display_name.to_string(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.sessions.write().remove(user_id);
        Ok(())
    }

    async fn purge_idle(&self, max_age: Duration) -> Result<u64, StoreError> {
        let cutoff = Utc::now() - max_age;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.updated_at >= cutoff);
        Ok((before - sessions.len()) as u64)
    }
}
