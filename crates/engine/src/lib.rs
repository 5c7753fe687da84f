//! Conversation Engine
//!
//! Stage-based dialog management for the storefront attendant:
//! - Ingress filtering (groups, broadcasts, own messages, empty text)
//! - Global trigger handling (exit, human handoff, menu reset)
//! - Per-stage dispatch over a closed stage set
//! - Per-user serialization so concurrent webhooks cannot interleave
//!   reads and writes of the same session

pub mod engine;
pub mod locks;
pub mod replies;

mod dispatch;
mod metrics;

use thiserror::Error;

pub use engine::{Attendant, AttendantOptions};
pub use locks::UserLocks;

/// Engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] balcao_persistence::StoreError),

    #[error("transport error: {0}")]
    Transport(#[from] balcao_core::TransportError),
}
