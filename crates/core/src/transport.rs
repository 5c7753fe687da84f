//! Outbound message delivery seam.
//!
//! The engine never talks to a chat gateway directly; it goes through
//! [`ChatTransport`] so the same flow runs against the HTTP gateway in
//! production and a recording double in tests.

use async_trait::async_trait;
use thiserror::Error;

/// Delivery failure reported by a transport implementation.
///
/// Failures are logged and the current message's remaining side effects
/// abandoned; nothing retries.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The gateway accepted the connection but refused the send.
    #[error("send to {recipient} failed: {reason}")]
    Send { recipient: String, reason: String },

    /// The gateway could not be reached at all.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Everything the conversation flow needs from the messaging channel.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver a plain text message.
    async fn send_text(&self, to: &str, body: &str) -> Result<(), TransportError>;

    /// Deliver a document by reference (path or URL understood by the
    /// gateway), used for the catalog artifact.
    async fn send_document(&self, to: &str, reference: &str) -> Result<(), TransportError>;

    /// Show a typing indicator. Best-effort; callers ignore failures.
    async fn send_typing(&self, to: &str) -> Result<(), TransportError>;
}
