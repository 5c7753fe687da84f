//! Inbound message shape and ingress filtering.

use serde::{Deserialize, Serialize};

/// Kind of an inbound event as reported by the chat gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Ordinary user-visible chat message.
    #[default]
    Chat,
    /// A previously sent message was revoked.
    Revoked,
    /// Channel notification (group subject change, e2e notice, ...).
    Notification,
    /// Anything else the gateway forwards.
    Other,
}

/// One inbound message as delivered by the chat gateway webhook.
///
/// `sender_id` is the opaque channel address of the user (for WhatsApp-style
/// gateways a phone number plus a server suffix, e.g. `5511999990000@c.us`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Channel address of the sender.
    pub sender_id: String,
    /// Visible text (caption for media messages).
    #[serde(default)]
    pub text: String,
    /// Message carries an attachment (image, audio, document).
    #[serde(default)]
    pub has_media: bool,
    /// Event kind.
    #[serde(default)]
    pub kind: MessageKind,
    /// Sent by our own account (echo of an outbound message).
    #[serde(default)]
    pub from_self: bool,
    /// Originated in a group chat.
    #[serde(default)]
    pub from_group: bool,
    /// Originated from a broadcast list.
    #[serde(default)]
    pub from_broadcast: bool,
}

impl InboundMessage {
    /// Plain chat message for tests and internal construction.
    pub fn chat(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            text: text.into(),
            has_media: false,
            kind: MessageKind::Chat,
            from_self: false,
            from_group: false,
            from_broadcast: false,
        }
    }

    /// Whether this message should enter the conversation flow at all.
    ///
    /// Group, broadcast and self-originated traffic is dropped, as are
    /// non-chat events and messages whose visible text is empty after
    /// trimming. Dropped messages produce no reply and no state change.
    pub fn is_processable(&self) -> bool {
        self.kind == MessageKind::Chat
            && !self.from_self
            && !self.from_group
            && !self.from_broadcast
            && !self.text.trim().is_empty()
    }
}

/// Reverse-lookup contact link for a channel address.
///
/// Keeps the digits before the server suffix, so `5511999990000@c.us`
/// becomes `https://wa.me/5511999990000`. Ids without a suffix are used
/// as-is.
pub fn contact_link(sender_id: &str) -> String {
    let digits = sender_id.split('@').next().unwrap_or(sender_id);
    format!("https://wa.me/{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_is_processable() {
        let msg = InboundMessage::chat("5511999990000@c.us", "oi");
        assert!(msg.is_processable());
    }

    #[test]
    fn test_filters_group_broadcast_and_self() {
        let mut msg = InboundMessage::chat("5511999990000@c.us", "oi");
        msg.from_group = true;
        assert!(!msg.is_processable());

        let mut msg = InboundMessage::chat("status@broadcast", "oi");
        msg.from_broadcast = true;
        assert!(!msg.is_processable());

        let mut msg = InboundMessage::chat("5511999990000@c.us", "oi");
        msg.from_self = true;
        assert!(!msg.is_processable());
    }

    #[test]
    fn test_filters_non_chat_and_blank_text() {
        let mut msg = InboundMessage::chat("5511999990000@c.us", "oi");
        msg.kind = MessageKind::Revoked;
        assert!(!msg.is_processable());

        let msg = InboundMessage::chat("5511999990000@c.us", "   \n ");
        assert!(!msg.is_processable());
    }

    #[test]
    fn test_contact_link_strips_suffix() {
        assert_eq!(
            contact_link("5511999990000@c.us"),
            "https://wa.me/5511999990000"
        );
        assert_eq!(contact_link("5511999990000"), "https://wa.me/5511999990000");
    }

    #[test]
    fn test_kind_deserializes_snake_case() {
        let msg: InboundMessage = serde_json::from_str(
            r#"{"sender_id":"1@c.us","text":"oi","kind":"notification"}"#,
        )
        .unwrap();
        assert_eq!(msg.kind, MessageKind::Notification);
    }
}
