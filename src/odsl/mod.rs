//! The scheduling command language
//!
//! Four command forms, one per calendar operation:
//!
//! ```text
//! add_outlook_schedule(description, start_time, end_time)
//! modify_outlook_schedule(schedule_id, description, start_time, end_time)
//! remove_outlook_schedule(schedule_id)
//! list_outlook_schedule()
//! ```
//!
//! This is the contract between the model's free-text reply and the
//! executor: `parse(&cmd.to_string()) == Ok(cmd)` for every command.

pub mod ast;
pub mod datetime;
pub mod parser;

pub use ast::{Command, CommandName};
pub use parser::{contains_command_name, parse, split_arguments, strip_code_markup};

/// Error type for command parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the input where parsing stopped
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ParseError {}
