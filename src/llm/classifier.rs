//! Intent classification
//!
//! One model call, one integer back. A reply that is not an integer is not an
//! error: it collapses to the default intent. Only a failed model call fails.

use crate::core::error::{CopilotError, Result};
use crate::core::types::{IntentCode, UserIntent};
use crate::llm::prompts::PromptKind;
use crate::llm::{ChatMessage, LanguageModel};

/// Classify `question` in the context of the prior conversation
pub async fn classify(
    model: &dyn LanguageModel,
    history: &[ChatMessage],
    question: &str,
) -> Result<IntentCode> {
    let reply = model
        .complete(PromptKind::Intent.system_prompt(), history, question)
        .await
        .map_err(|e| CopilotError::ClassificationError(e.to_string()))?;

    let intent = interpret_reply(&reply);
    tracing::info!(intent, reply = %reply.trim(), "Classified intent");
    Ok(intent)
}

/// Read the model's reply as an intent code
pub fn interpret_reply(reply: &str) -> IntentCode {
    reply
        .trim()
        .parse::<IntentCode>()
        .unwrap_or(UserIntent::Default.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedModel(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl LanguageModel for FixedModel {
        async fn complete(&self, system: &str, _history: &[ChatMessage], _user: &str) -> Result<String> {
            assert_eq!(system, PromptKind::Intent.system_prompt());
            self.0
                .map(String::from)
                .map_err(|e| CopilotError::LlmError(e.into()))
        }
    }

    #[test]
    fn test_interpret_reply() {
        assert_eq!(interpret_reply("2"), 2);
        assert_eq!(interpret_reply(" 4\n"), 4);
        assert_eq!(interpret_reply("banana"), 5);
        assert_eq!(interpret_reply("2."), 5);
        assert_eq!(interpret_reply(""), 5);
        // Out of range but syntactically valid stays as is
        assert_eq!(interpret_reply("9"), 9);
    }

    #[tokio::test]
    async fn test_classify_numeric_reply() {
        let intent = classify(&FixedModel(Ok("2")), &[], "move my standup").await.unwrap();
        assert_eq!(intent, 2);
    }

    #[tokio::test]
    async fn test_classify_garbage_reply_defaults() {
        let intent = classify(&FixedModel(Ok("banana")), &[], "hello").await.unwrap();
        assert_eq!(intent, UserIntent::Default.code());
    }

    #[tokio::test]
    async fn test_classify_model_failure() {
        let err = classify(&FixedModel(Err("quota exceeded")), &[], "hello")
            .await
            .unwrap_err();
        match err {
            CopilotError::ClassificationError(msg) => assert!(msg.contains("quota exceeded")),
            other => panic!("Expected ClassificationError, got {:?}", other),
        }
    }
}
