//! LLM Provider implementations

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{Result, TutorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged prompt turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Generic LLM provider trait
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
    fn name(&self) -> &str;
}

/// Ollama provider (local)
pub struct OllamaProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = OllamaRequest {
            model: &self.config.model,
            messages,
            stream: false,
        };

        let url = format!("{}/api/chat", self.config.endpoint.trim_end_matches('/'));
        let response = self.client.post(&url).json(&request).send().await?;
        let response: OllamaResponse = read_json(self.name(), response).await?;

        non_empty(self.name(), response.message.content)
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
    api_key: String,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessageResponse,
}

#[derive(Deserialize)]
struct OpenAiMessageResponse {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = OpenAiRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response: OpenAiResponse = read_json(self.name(), response).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        non_empty(self.name(), content)
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}

/// Factory function to create provider from config
pub fn create_provider(
    config: ProviderConfig,
    api_key: Option<String>,
) -> Result<Box<dyn LlmProvider>> {
    match config.kind {
        ProviderKind::Ollama => Ok(Box::new(OllamaProvider::new(config))),
        ProviderKind::OpenAi => {
            let key = api_key.ok_or_else(|| TutorError::MissingApiKey("OpenAI".to_string()))?;
            Ok(Box::new(OpenAiProvider::new(config, key)))
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(provider: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TutorError::Provider(format!(
            "{} returned {}: {}",
            provider, status, body
        )));
    }
    Ok(response.json().await?)
}

fn non_empty(provider: &str, content: String) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(TutorError::Provider(format!("No response from {}", provider)));
    }
    Ok(content.to_string())
}
