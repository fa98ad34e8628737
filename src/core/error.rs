use thiserror::Error;

use crate::odsl::ParseError;

#[derive(Error, Debug)]
pub enum CopilotError {
    #[error("Failed to classify intent: {0}")]
    ClassificationError(String),

    #[error("{0}")]
    ParseError(#[from] ParseError),

    #[error("Invalid datetime format: {0}")]
    InvalidDateTimeError(String),

    #[error("Command not found: {0}")]
    UnknownCommandError(String),

    #[error("Calendar backend error: {0}")]
    BackendError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Failed to send message: {0}")]
    SendMessageError(#[source] Box<CopilotError>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl CopilotError {
    /// Wrap a failure that happened while handling a conversational turn.
    pub fn send_message(inner: CopilotError) -> Self {
        match inner {
            already @ CopilotError::SendMessageError(_) => already,
            other => CopilotError::SendMessageError(Box::new(other)),
        }
    }

    /// True for failures the user can fix by rephrasing the request, as
    /// opposed to infrastructure failures (model, backend, IO).
    pub fn is_user_correctable(&self) -> bool {
        match self {
            CopilotError::ParseError(_)
            | CopilotError::InvalidDateTimeError(_)
            | CopilotError::UnknownCommandError(_) => true,
            CopilotError::SendMessageError(inner) => inner.is_user_correctable(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CopilotError>;
