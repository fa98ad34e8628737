//! Language model access
//!
//! The model is used twice per turn at most: once to classify the user's
//! intent, once to turn the request into a command. Both go through the
//! `LanguageModel` trait so the pipeline can run against a scripted model.

pub mod classifier;
pub mod client;
pub mod generator;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Speaker;

pub use classifier::classify;
pub use client::LlmClient;
pub use generator::generate_reply;
pub use prompts::PromptKind;

/// One prior message handed to the model as conversation context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Speaker,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Speaker, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Text completion service
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `user` given a system prompt and the prior conversation
    async fn complete(&self, system: &str, history: &[ChatMessage], user: &str) -> Result<String>;
}
