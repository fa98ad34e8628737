//! Conversation layer: history, intent routing and the per-turn pipeline

pub mod history;
pub mod orchestrator;
pub mod strategy;

pub use history::{ConversationHistory, DialogAction};
pub use orchestrator::{format_listing, ChatSession, CopilotContext, NO_SCHEDULE_FOUND};
pub use strategy::Strategy;
