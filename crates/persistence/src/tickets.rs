//! Append-only support ticket sink.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::params;

use balcao_core::Ticket;

use crate::{Database, StoreError};

/// Write-only ticket log. `append` returns the record id, which increases
/// monotonically within one sink.
#[async_trait]
pub trait TicketSink: Send + Sync {
    async fn append(&self, ticket: &Ticket) -> Result<i64, StoreError>;
}

/// SQLite-backed implementation.
pub struct SqliteTicketSink {
    db: Arc<Database>,
}

impl SqliteTicketSink {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TicketSink for SqliteTicketSink {
    async fn append(&self, ticket: &Ticket) -> Result<i64, StoreError> {
        let db = self.db.clone();
        let ticket = ticket.clone();

        let id = tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO tickets
                        (user_id, display_name, product, description, status, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        ticket.user_id,
                        ticket.display_name,
                        ticket.product,
                        ticket.description,
                        ticket.status.as_str(),
                        ticket.created_at.timestamp_millis(),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;

        tracing::info!(ticket_id = id, user_id = %ticket.user_id, product = %ticket.product, "ticket appended");
        Ok(id)
    }
}

/// Vec-backed sink for tests; exposes the appended records.
#[derive(Default)]
pub struct InMemoryTicketSink {
    tickets: Mutex<Vec<Ticket>>,
}

impl InMemoryTicketSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Ticket> {
        self.tickets.lock().clone()
    }
}

#[async_trait]
impl TicketSink for InMemoryTicketSink {
    async fn append(&self, ticket: &Ticket) -> Result<i64, StoreError> {
        let mut tickets = self.tickets.lock();
        tickets.push(ticket.clone());
        Ok(tickets.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balcao_core::TicketStatus;

    #[tokio::test]
    async fn test_append_returns_monotonic_ids() {
        let sink = SqliteTicketSink::new(Arc::new(Database::in_memory().unwrap()));

        let first = sink
            .append(&Ticket::open("1@c.us", "Maria", "Estufa", "nao esquenta"))
            .await
            .unwrap();
        let second = sink
            .append(&Ticket::open("2@c.us", "Ze", "não especificado", "barulho"))
            .await
            .unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_appended_ticket_is_persisted() {
        let db = Arc::new(Database::in_memory().unwrap());
        let sink = SqliteTicketSink::new(db.clone());

        let id = sink
            .append(&Ticket::open("1@c.us", "Maria", "Geladeira 410L", "nao gela"))
            .await
            .unwrap();

        db.with_conn(|conn| {
            let (product, status): (String, String) = conn.query_row(
                "SELECT product, status FROM tickets WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            assert_eq!(product, "Geladeira 410L");
            assert_eq!(status, TicketStatus::Open.as_str());
            Ok(())
        })
        .unwrap();
    }

    #[tokio::test]
    async fn test_in_memory_sink_records_in_order() {
        let sink = InMemoryTicketSink::new();
        sink.append(&Ticket::open("1@c.us", "A", "x", "one"))
            .await
            .unwrap();
        sink.append(&Ticket::open("1@c.us", "A", "y", "two"))
            .await
            .unwrap();

        let all = sink.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].description, "one");
        assert_eq!(all[1].description, "two");
    }
}
