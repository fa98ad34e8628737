//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a dialog action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub Uuid);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw intent code as classified by the language model.
///
/// Kept as a plain integer so out-of-range replies survive into the history
/// unchanged; routing decides what to do with them.
pub type IntentCode = i64;

/// Intent code stored on turns that were never classified
pub const UNCLASSIFIED_INTENT: IntentCode = 0;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
    System,
}

impl Speaker {
    /// Role name used by chat-completion APIs
    pub fn as_role(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
            Speaker::System => "system",
        }
    }
}

/// Intents the classifier is prompted to choose from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserIntent {
    AddSchedule = 1,
    ModifySchedule = 2,
    RemoveSchedule = 3,
    ListSchedule = 4,
    Default = 5,
}

impl UserIntent {
    pub fn code(self) -> IntentCode {
        self as IntentCode
    }

    pub fn from_code(code: IntentCode) -> Option<Self> {
        match code {
            1 => Some(Self::AddSchedule),
            2 => Some(Self::ModifySchedule),
            3 => Some(Self::RemoveSchedule),
            4 => Some(Self::ListSchedule),
            5 => Some(Self::Default),
            _ => None,
        }
    }
}
