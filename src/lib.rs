//! mini-copilot - a conversational front-end for an Outlook calendar
//!
//! Free-text requests are classified by intent, turned into commands of a
//! small scheduling language by a language model, and executed against a
//! calendar backend.

pub mod calendar;
pub mod chat;
pub mod command;
pub mod core;
pub mod llm;
pub mod odsl;
