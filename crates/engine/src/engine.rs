//! The attendant: entry point for every inbound message.
//!
//! Holds the injected collaborators (catalog snapshot, stores, transport)
//! and runs the ingress filter, per-user lock and top-level error catch.
//! Stage dispatch itself lives in `dispatch.rs`.

use std::sync::Arc;

use balcao_catalog::CatalogIndex;
use balcao_core::{ChatTransport, InboundMessage};
use balcao_persistence::{RatingSink, SessionStore, Stores, TicketSink};

use crate::locks::UserLocks;
use crate::metrics;
use crate::EngineError;

/// Behavior knobs for the attendant, fixed at construction.
#[derive(Debug, Clone)]
pub struct AttendantOptions {
    /// Company name rendered into the greeting and menu.
    pub company_name: String,

    /// Channel address that receives handoff alerts, ticket alerts and
    /// relayed messages. Empty means "drop alerts with a warning", which
    /// only makes sense in development.
    pub specialist_id: String,

    /// Shareable catalog document (path or URL the gateway understands).
    /// Menu option 1 sends an apology when unset.
    pub catalog_artifact: Option<String>,
}

impl Default for AttendantOptions {
    fn default() -> Self {
        Self {
            company_name: "Balcão Equipamentos".to_string(),
            specialist_id: String::new(),
            catalog_artifact: None,
        }
    }
}

/// The conversation engine.
///
/// One instance serves all users; per-user state lives entirely in the
/// session store. All collaborators are injected, so tests run the real
/// dispatch logic against in-memory stores and a recording transport.
pub struct Attendant {
    pub(crate) catalog: Arc<CatalogIndex>,
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) tickets: Arc<dyn TicketSink>,
    pub(crate) ratings: Arc<dyn RatingSink>,
    pub(crate) transport: Arc<dyn ChatTransport>,
    pub(crate) options: AttendantOptions,
    locks: UserLocks,
}

impl Attendant {
    pub fn new(
        catalog: Arc<CatalogIndex>,
        stores: Stores,
        transport: Arc<dyn ChatTransport>,
        options: AttendantOptions,
    ) -> Self {
        Self {
            catalog,
            sessions: stores.sessions,
            tickets: stores.tickets,
            ratings: stores.ratings,
            transport,
            options,
            locks: UserLocks::new(),
        }
    }

    /// Handle one inbound message end to end.
    ///
    /// Never returns an error: failures are logged and the message is
    /// dropped, so one user's bad day cannot take the process down or
    /// leak into another user's session. Messages from the same user are
    /// serialized by a keyed lock; distinct users proceed concurrently.
    pub async fn handle_message(&self, message: InboundMessage) {
        if !message.is_processable() {
            metrics::record_message_dropped("ingress");
            tracing::debug!(
                sender = %message.sender_id,
                kind = ?message.kind,
                "ignoring non-processable message"
            );
            return;
        }
        metrics::record_message_received();

        let _guard = self.locks.acquire(&message.sender_id).await;
        if let Err(error) = self.dispatch(&message).await {
            metrics::record_message_dropped("error");
            tracing::error!(
                sender = %message.sender_id,
                error = %error,
                "message handling failed; dropping"
            );
        }
    }

    /// Send a reply to the message's author, with a best-effort typing
    /// indicator first.
    pub(crate) async fn send_to_user(
        &self,
        message: &InboundMessage,
        content: String,
    ) -> Result<(), EngineError> {
        if let Err(error) = self.transport.send_typing(&message.sender_id).await {
            tracing::debug!(error = %error, "typing indicator failed");
        }
        self.transport
            .send_text(&message.sender_id, &content)
            .await?;
        Ok(())
    }

    /// Forward an alert or relay to the fixed specialist recipient.
    pub(crate) async fn notify_specialist(&self, content: String) -> Result<(), EngineError> {
        if self.options.specialist_id.is_empty() {
            tracing::warn!("no specialist recipient configured; alert not sent");
            return Ok(());
        }
        self.transport
            .send_text(&self.options.specialist_id, &content)
            .await?;
        Ok(())
    }
}
