//! Response generation: asks the model for a command (or a plain-text reply)

use crate::core::error::Result;
use crate::llm::prompts::PromptKind;
use crate::llm::{ChatMessage, LanguageModel};

/// Generate the assistant's reply to `question` with the command prompt
pub async fn generate_reply(
    model: &dyn LanguageModel,
    history: &[ChatMessage],
    question: &str,
) -> Result<String> {
    let reply = model
        .complete(PromptKind::Odsl.system_prompt(), history, question)
        .await?;
    tracing::debug!(reply = %reply, "Generated reply");
    Ok(reply)
}
