//! Async LLM client for explanation text
//!
//! This is a model-agnostic HTTP client for calling LLM APIs.
//! Supports Anthropic, OpenAI-compatible APIs, and a thin prompt relay
//! (`POST {"prompt"}` -> `{"response"}`) that keeps the API key server-side.
//! Key principle: the LLM only explains numbers, it never produces them.

use crate::core::config::LlmSettings;
use crate::core::error::{ExplorerError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Anything that can turn a prompt into text
pub trait TextGenerator: Send + Sync {
    fn complete(&self, system: &str, user: &str) -> impl Future<Output = Result<String>> + Send;
}

/// API format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
    Relay,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
    timeout: Duration,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
            timeout: Duration::from_secs(30),
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else if url.contains("/chat/completions") {
            ApiFormat::OpenAI
        } else if url.contains("/api/") {
            // Same-origin relay route
            ApiFormat::Relay
        } else {
            ApiFormat::OpenAI
        }
    }

    pub fn with_format(mut self, format: ApiFormat) -> Self {
        self.api_format = format;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Same endpoint and key, different model
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            api_url: self.api_url.clone(),
            model: model.into(),
            api_format: self.api_format,
            timeout: self.timeout,
        }
    }

    pub fn format(&self) -> ApiFormat {
        self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build a client from settings plus `LLM_API_KEY`
    ///
    /// The key is optional only for relay endpoints.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let format = settings
            .format
            .unwrap_or_else(|| Self::detect_api_format(&settings.api_url));
        let api_key = match std::env::var("LLM_API_KEY") {
            Ok(key) => key,
            Err(_) if format == ApiFormat::Relay => String::new(),
            Err(_) => return Err(ExplorerError::LlmError("LLM_API_KEY not set".into())),
        };

        Ok(Self::new(api_key, settings.api_url.clone(), settings.model.clone())
            .with_format(format)
            .with_timeout(Duration::from_secs(settings.timeout_secs)))
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            system: system.into(),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ExplorerError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExplorerError::LlmError(format!("API error: {}", error_text)));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ExplorerError::LlmError(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| ExplorerError::LlmError("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ExplorerError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExplorerError::LlmError(format!("API error: {}", error_text)));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ExplorerError::LlmError(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ExplorerError::LlmError("Empty response".into()))
    }

    /// The relay takes a single prompt, so system and user text are joined
    async fn complete_relay(&self, system: &str, user: &str) -> Result<String> {
        let request = RelayRequest {
            prompt: format!("{}\n\n{}", system, user),
        };

        let mut builder = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("content-type", "application/json");
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| ExplorerError::LlmError(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        parse_relay_body(status.as_u16(), &body)
    }
}

impl TextGenerator for LlmClient {
    /// Send a completion request to the LLM
    ///
    /// # Arguments
    /// * `system` - System prompt providing context and instructions
    /// * `user` - User message/query to process
    ///
    /// # Returns
    /// The LLM's text response
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
            ApiFormat::Relay => self.complete_relay(system, user).await,
        }
    }
}

/// Interpret a relay reply; error bodies carry `error` and `details`
fn parse_relay_body(status: u16, body: &str) -> Result<String> {
    let reply: RelayResponse = serde_json::from_str(body).map_err(|e| {
        ExplorerError::LlmError(format!("Relay returned {} with unreadable body: {}", status, e))
    })?;

    if !(200..300).contains(&status) {
        let error = reply.error.unwrap_or_else(|| "Unknown error".into());
        return Err(match reply.details {
            Some(details) => {
                ExplorerError::LlmError(format!("Relay error {}: {} ({})", status, error, details))
            }
            None => ExplorerError::LlmError(format!("Relay error {}: {}", status, error)),
        });
    }

    match reply.response {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ExplorerError::LlmError("Empty response".into())),
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
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

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
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
    content: String,
}

// Relay format
#[derive(Serialize)]
struct RelayRequest {
    prompt: String,
}

#[derive(Deserialize)]
struct RelayResponse {
    response: Option<String>,
    error: Option<String>,
    details: Option<String>,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}
