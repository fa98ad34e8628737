//! Conversation history

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{ActionId, IntentCode, Speaker};
use crate::llm::ChatMessage;

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogAction {
    pub id: ActionId,
    pub intent: IntentCode,
    pub speaker: Speaker,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl DialogAction {
    pub fn new(intent: IntentCode, speaker: Speaker, message: impl Into<String>) -> Self {
        Self {
            id: ActionId::new(),
            intent,
            speaker,
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}

/// Ordered, append-only record of a session's turns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    entries: Vec<DialogAction>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new turn stamped with the current time
    pub fn append(&mut self, intent: IntentCode, speaker: Speaker, message: impl Into<String>) -> ActionId {
        self.push(DialogAction::new(intent, speaker, message))
    }

    /// Append an existing action. A timestamp earlier than the previous
    /// entry's is clamped up to it.
    pub fn push(&mut self, mut action: DialogAction) -> ActionId {
        if let Some(previous) = self.entries.last() {
            if action.timestamp < previous.timestamp {
                tracing::debug!(
                    previous = %previous.timestamp,
                    clamped = %action.timestamp,
                    "Clock moved backwards, clamping timestamp"
                );
                action.timestamp = previous.timestamp;
            }
        }
        let id = action.id;
        tracing::debug!(%id, speaker = ?action.speaker, intent = action.intent, "Appended dialog action");
        self.entries.push(action);
        id
    }

    /// Replace the message of the most recent entry, if it is `id`.
    ///
    /// Returns false when `id` is not the last entry; older turns are never edited.
    pub fn rewrite_last(&mut self, id: ActionId, message: impl Into<String>) -> bool {
        match self.entries.last_mut() {
            Some(last) if last.id == id => {
                last.message = message.into();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[DialogAction] {
        &self.entries
    }

    pub fn last(&self) -> Option<&DialogAction> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The history as model context, oldest first
    pub fn to_chat_messages(&self) -> Vec<ChatMessage> {
        self.entries
            .iter()
            .map(|action| ChatMessage::new(action.speaker, action.message.clone()))
            .collect()
    }

    /// Pretty-printed JSON transcript
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
