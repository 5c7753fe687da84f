//! Conversation stages and the per-user session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a user currently is in the attendant flow.
///
/// The set is closed: persisted values that do not name one of these
/// variants are rejected at the read boundary instead of being coerced
/// into a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Waiting for the user to state their name.
    #[default]
    NameCapture,
    /// Main menu shown, numeric options or free-text product queries.
    MainMenu,
    /// Collecting a problem description for a support ticket.
    SupportTriage,
    /// A human specialist owns the thread; messages are relayed.
    AwaitingHuman,
    /// Waiting for a 1-5 service rating.
    Rating,
    /// Bot muted; only reactivation keywords are honored.
    Silent,
}

impl Stage {
    /// Stable textual form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NameCapture => "name_capture",
            Stage::MainMenu => "main_menu",
            Stage::SupportTriage => "support_triage",
            Stage::AwaitingHuman => "awaiting_human",
            Stage::Rating => "rating",
            Stage::Silent => "silent",
        }
    }

    /// All stages, for iteration in tests.
    pub fn all() -> [Stage; 6] {
        [
            Stage::NameCapture,
            Stage::MainMenu,
            Stage::SupportTriage,
            Stage::AwaitingHuman,
            Stage::Rating,
            Stage::Silent,
        ]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored stage value did not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage value: {0:?}")]
pub struct ParseStageError(pub String);

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name_capture" => Ok(Stage::NameCapture),
            "main_menu" => Ok(Stage::MainMenu),
            "support_triage" => Ok(Stage::SupportTriage),
            "awaiting_human" => Ok(Stage::AwaitingHuman),
            "rating" => Ok(Stage::Rating),
            "silent" => Ok(Stage::Silent),
            other => Err(ParseStageError(other.to_string())),
        }
    }
}

/// Persisted conversation state for one user.
///
/// Absence of a record means "new user"; the record never outlives the
/// conversation (closing flows delete it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Channel address the session is keyed by.
    pub user_id: String,
    /// Current stage.
    pub stage: Stage,
    /// Captured display name, empty until name capture succeeds.
    pub display_name: String,
    /// Last time the record was written.
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Fresh session at the start of the flow.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            stage: Stage::NameCapture,
            display_name: String::new(),
            updated_at: Utc::now(),
        }
    }

    /// Whether a display name has been captured yet.
    ///
    /// Global menu/handoff commands only apply once this is true.
    pub fn has_name(&self) -> bool {
        !self.display_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_round_trips_through_storage_form() {
        for stage in Stage::all() {
            assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
        }
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        let err = "browsing".parse::<Stage>().unwrap_err();
        assert_eq!(err, ParseStageError("browsing".to_string()));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Stage::AwaitingHuman).unwrap();
        assert_eq!(json, "\"awaiting_human\"");
    }

    #[test]
    fn test_new_session_has_no_name() {
        let session = SessionRecord::new("5511999990000@c.us");
        assert_eq!(session.stage, Stage::NameCapture);
        assert!(!session.has_name());
    }
}
