//! Append-only service rating sink.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::params;

use balcao_core::Rating;

use crate::{Database, StoreError};

/// Write-only rating log; same contract as the ticket sink.
#[async_trait]
pub trait RatingSink: Send + Sync {
    async fn append(&self, rating: &Rating) -> Result<i64, StoreError>;
}

/// SQLite-backed implementation.
pub struct SqliteRatingSink {
    db: Arc<Database>,
}

impl SqliteRatingSink {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RatingSink for SqliteRatingSink {
    async fn append(&self, rating: &Rating) -> Result<i64, StoreError> {
        let db = self.db.clone();
        let rating = rating.clone();

        let id = tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO ratings (user_id, display_name, feedback, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        rating.user_id,
                        rating.display_name,
                        rating.feedback,
                        rating.created_at.timestamp_millis(),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;

        tracing::info!(rating_id = id, user_id = %rating.user_id, "rating appended");
        Ok(id)
    }
}

/// Vec-backed sink for tests.
#[derive(Default)]
pub struct InMemoryRatingSink {
    ratings: Mutex<Vec<Rating>>,
}

impl InMemoryRatingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Rating> {
        self.ratings.lock().clone()
    }
}

#[async_trait]
impl RatingSink for InMemoryRatingSink {
    async fn append(&self, rating: &Rating) -> Result<i64, StoreError> {
        let mut ratings = self.ratings.lock();
        ratings.push(rating.clone());
        Ok(ratings.len() as i64)
    }
}
