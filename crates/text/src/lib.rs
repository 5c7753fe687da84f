//! Text handling for the balcao attendant.
//!
//! Two concerns live here: canonical normalization of user input (every
//! comparison in the conversation flow happens on normalized text) and the
//! declarative keyword tables that drive global commands.

pub mod normalize;
pub mod triggers;

pub use normalize::{capitalize_word, first_token, normalize};
pub use triggers::{MatchKind, Trigger, TriggerSet};
