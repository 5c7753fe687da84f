//! Support ticket and service rating write models.
//!
//! Both are append-only from the attendant's point of view: it creates
//! them and hands them to a sink, nothing in the flow reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a support ticket.
///
/// Only `Open` is produced here; the other states exist for whoever works
/// the queue downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A support ticket raised from the triage flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Channel address of the reporting user.
    pub user_id: String,
    /// Captured display name at the time of the report.
    pub display_name: String,
    /// Product the complaint refers to, or the unspecified sentinel when
    /// the description matched nothing in the catalog.
    pub product: String,
    /// Verbatim problem description.
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Open ticket stamped with the current time.
    pub fn open(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        product: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            product: product.into(),
            description: description.into(),
            status: TicketStatus::Open,
            created_at: Utc::now(),
        }
    }
}

/// A service rating left at the end of a conversation.
///
/// `feedback` is the raw message text; interpreting "5" vs "excelente" is
/// presentation-side only and never stored in a structured way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: String,
    pub display_name: String,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            feedback: feedback.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tickets_open() {
        let ticket = Ticket::open("1@c.us", "Maria", "Estufa 5 bandejas", "nao liga");
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[test]
    fn test_status_storage_form() {
        assert_eq!(TicketStatus::InProgress.as_str(), "in_progress");
        assert_eq!(
            serde_json::to_string(&TicketStatus::Resolved).unwrap(),
            "\"resolved\""
        );
    }
}
