//! Async LLM client
//!
//! A model-agnostic HTTP client for chat-completion APIs. Supports the
//! Anthropic Messages API, OpenAI-compatible APIs (OpenAI, DeepSeek, ...) and
//! Azure OpenAI deployments.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::config::LlmConfig;
use crate::core::error::{CopilotError, Result};
use crate::core::types::Speaker;
use crate::llm::{ChatMessage, LanguageModel};

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
    AzureOpenAI,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
    api_version: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl LlmClient {
    /// Create a new LLM client with default sampling settings
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let defaults = LlmConfig::default();
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
            api_version: defaults.api_version,
            temperature: defaults.temperature,
            top_p: defaults.top_p,
            max_tokens: defaults.max_tokens,
        }
    }

    /// Create a client from the `[llm]` configuration section
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CopilotError::ConfigError("LLM_API_KEY not set".into()))?;

        let mut client = Self::new(api_key, config.api_url.clone(), config.model.clone());
        client.api_version = config.api_version.clone();
        client.temperature = config.temperature;
        client.top_p = config.top_p;
        client.max_tokens = config.max_tokens;
        Ok(client)
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else if url.contains("openai.azure.com") {
            ApiFormat::AzureOpenAI
        } else {
            // DeepSeek, OpenAI, and other compatible APIs use OpenAI format
            ApiFormat::OpenAI
        }
    }

    async fn complete_anthropic(
        &self,
        system: &str,
        history: &[ChatMessage],
        user: &str,
    ) -> Result<String> {
        // The Messages API takes the system prompt separately and only
        // accepts user/assistant turns.
        let messages = history
            .iter()
            .filter(|m| m.role != Speaker::System)
            .map(Message::from)
            .chain(std::iter::once(Message::user(user)))
            .collect();

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system.into(),
            messages,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CopilotError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CopilotError::LlmError(format!("API error: {}", error_text)));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CopilotError::LlmError(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| CopilotError::LlmError("Empty response".into()))
    }

    async fn complete_openai(
        &self,
        system: &str,
        history: &[ChatMessage],
        user: &str,
    ) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            messages: chat_messages(system, history, user),
        };

        let builder = self.client.post(&self.api_url);
        let builder = match self.api_format {
            ApiFormat::AzureOpenAI => builder
                .query(&[("api-version", self.api_version.as_str())])
                .header("api-key", &self.api_key),
            _ => builder.header("Authorization", format!("Bearer {}", self.api_key)),
        };

        let response = builder
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CopilotError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CopilotError::LlmError(format!("API error: {}", error_text)));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| CopilotError::LlmError(e.to_string()))?;

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| CopilotError::LlmError("Empty response".into()))
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn complete(&self, system: &str, history: &[ChatMessage], user: &str) -> Result<String> {
        tracing::debug!(model = %self.model, history = history.len(), "Sending completion request");
        let reply = match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, history, user).await,
            ApiFormat::OpenAI | ApiFormat::AzureOpenAI => {
                self.complete_openai(system, history, user).await
            }
        }?;
        tracing::debug!(reply = %reply, "Received completion");
        Ok(reply)
    }
}

/// System prompt, then prior turns, then the new user message
fn chat_messages(system: &str, history: &[ChatMessage], user: &str) -> Vec<Message> {
    std::iter::once(Message {
        role: Speaker::System.as_role().into(),
        content: system.into(),
    })
    .chain(history.iter().map(Message::from))
    .chain(std::iter::once(Message::user(user)))
    .collect()
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format (OpenAI, Azure, DeepSeek, etc.)
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// Shared
#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn user(content: &str) -> Self {
        Self {
            role: Speaker::User.as_role().into(),
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for Message {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_role().into(),
            content: message.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LlmClient::new(
            "test-key".into(),
            "https://api.example.com".into(),
            "test-model".into(),
        );
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, "https://api.example.com");
        assert_eq!(client.model, "test-model");
        assert_eq!(client.api_format, ApiFormat::OpenAI);
        assert_eq!(client.max_tokens, 800);
    }

    #[test]
    fn test_detect_api_format() {
        assert_eq!(
            LlmClient::detect_api_format("https://api.anthropic.com/v1/messages"),
            ApiFormat::Anthropic
        );
        assert_eq!(
            LlmClient::detect_api_format(
                "https://contoso.openai.azure.com/openai/deployments/gpt35/chat/completions"
            ),
            ApiFormat::AzureOpenAI
        );
        assert_eq!(
            LlmClient::detect_api_format("https://api.deepseek.com/chat/completions"),
            ApiFormat::OpenAI
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = LlmConfig::default();
        assert!(matches!(
            LlmClient::from_config(&config),
            Err(CopilotError::ConfigError(_))
        ));

        let config = LlmConfig {
            api_key: Some("k".into()),
            temperature: 0.2,
            ..LlmConfig::default()
        };
        let client = LlmClient::from_config(&config).unwrap();
        assert!((client.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_chat_messages_order() {
        let history = vec![
            ChatMessage::new(Speaker::User, "list my meetings"),
            ChatMessage::new(Speaker::Assistant, "No.0 Standup"),
        ];
        let messages = chat_messages("be terse", &history, "cancel it");

        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[0].content, "be terse");
        assert_eq!(messages[3].content, "cancel it");
    }

    #[test]
    fn test_openai_response_with_null_content() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
