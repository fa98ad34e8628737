//! Application configuration
//!
//! Loaded from a TOML file (see `config/copilot.toml`), then overridden from
//! the environment so secrets never have to live in the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CopilotError, Result};

/// Top-level configuration for the assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

/// Language model endpoint and sampling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    // === ENDPOINT ===
    /// Completion endpoint.
    ///
    /// The wire format is detected from the URL: `anthropic.com` uses the
    /// Messages API, `openai.azure.com` uses Azure deployments, anything else
    /// is treated as OpenAI-compatible chat completions.
    pub api_url: String,

    /// Model name (ignored by Azure, where the deployment in the URL decides)
    pub model: String,

    /// API key. Usually supplied through `LLM_API_KEY` instead of the file.
    pub api_key: Option<String>,

    /// `api-version` query parameter, only sent to Azure endpoints
    pub api_version: String,

    // === SAMPLING ===
    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling mass
    pub top_p: f32,

    /// Upper bound on reply length. Commands and intent digits are short.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            api_version: "2024-02-01".into(),
            temperature: 0.7,
            top_p: 0.95,
            max_tokens: 800,
        }
    }
}

/// Which calendar implementation backs the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarBackend {
    /// Microsoft Graph (Outlook calendar)
    #[default]
    Graph,
    /// In-process store, nothing leaves the machine
    Memory,
}

/// Calendar backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub backend: CalendarBackend,

    // === GRAPH CREDENTIALS ===
    /// Azure AD tenant id
    pub tenant: String,

    /// App registration client id
    pub client_id: String,

    /// App registration secret. Usually supplied through `GRAPH_CLIENT_SECRET`.
    pub client_secret: Option<String>,

    /// Mailbox whose calendar is managed (user principal name)
    pub user: String,

    // === GRAPH ENDPOINTS ===
    /// Graph API root
    pub graph_url: String,

    /// Token authority root; the tenant is appended
    pub authority_url: String,

    /// Time zone attached to start/end times sent to the backend
    pub time_zone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            backend: CalendarBackend::Graph,
            tenant: String::new(),
            client_id: String::new(),
            client_secret: None,
            user: String::new(),
            graph_url: "https://graph.microsoft.com/v1.0".into(),
            authority_url: "https://login.microsoftonline.com".into(),
            time_zone: "UTC".into(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` wins when set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "mini_copilot=info".into(),
        }
    }
}

impl AppConfig {
    /// Read `path` (defaults when absent), apply environment overrides,
    /// switch to the in-memory calendar when `offline`, then validate.
    pub fn prepare(path: Option<&Path>, offline: bool) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        if offline {
            config.calendar.backend = CalendarBackend::Memory;
        }
        config.validate().map_err(CopilotError::ConfigError)?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override settings from environment variables.
    ///
    /// Recognized: `LLM_API_KEY`, `LLM_API_URL`, `LLM_MODEL`,
    /// `GRAPH_CLIENT_SECRET`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("LLM_API_URL") {
            self.llm.api_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(secret) = lookup("GRAPH_CLIENT_SECRET") {
            self.calendar.client_secret = Some(secret);
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.llm.api_url.trim().is_empty() {
            return Err("llm.api_url must not be empty".into());
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(format!(
                "llm.temperature ({}) must be within 0.0..=2.0",
                self.llm.temperature
            ));
        }

        if self.llm.top_p <= 0.0 || self.llm.top_p > 1.0 {
            return Err(format!(
                "llm.top_p ({}) must be within (0.0, 1.0]",
                self.llm.top_p
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err("llm.max_tokens must be positive".into());
        }

        if self.calendar.backend == CalendarBackend::Graph {
            let missing: Vec<&str> = [
                ("calendar.tenant", self.calendar.tenant.is_empty()),
                ("calendar.client_id", self.calendar.client_id.is_empty()),
                ("calendar.user", self.calendar.user.is_empty()),
                (
                    "calendar.client_secret",
                    self.calendar.client_secret.as_deref().unwrap_or("").is_empty(),
                ),
            ]
            .into_iter()
            .filter(|(_, is_missing)| *is_missing)
            .map(|(name, _)| name)
            .collect();

            if !missing.is_empty() {
                return Err(format!(
                    "graph calendar backend requires {}",
                    missing.join(", ")
                ));
            }
        }

        Ok(())
    }
}
