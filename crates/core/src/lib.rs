//! Core types and traits shared across the balcao workspace.
//!
//! Everything here is channel-agnostic: inbound/outbound message shapes,
//! the conversation stage machine, session records, catalog records and the
//! ticket/rating write models. The only trait is [`ChatTransport`], the seam
//! between the conversation engine and whatever gateway actually delivers
//! messages.

pub mod catalog;
pub mod message;
pub mod session;
pub mod ticket;
pub mod transport;

pub use catalog::{Category, Product};
pub use message::{contact_link, InboundMessage, MessageKind};
pub use session::{ParseStageError, SessionRecord, Stage};
pub use ticket::{Rating, Ticket, TicketStatus};
pub use transport::{ChatTransport, TransportError};
