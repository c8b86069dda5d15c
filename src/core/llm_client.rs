// src/core/llm_client.rs
use super::config_manager::LlmSettings;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// A chat-completion backend answering a single user prompt.
#[rocket::async_trait]
pub trait ChatCompletion: Send + Sync {
    /// False when the backend cannot be called at all (no credentials).
    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// OpenRouter-compatible `/chat/completions` client.
pub struct OpenRouterClient {
    client: Client,
    settings: LlmSettings,
}

impl OpenRouterClient {
    pub fn new(settings: LlmSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: Client, settings: LlmSettings) -> Self {
        Self { client, settings }
    }
}

#[rocket::async_trait]
impl ChatCompletion for OpenRouterClient {
    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .context("OPENROUTER_API_KEY não configurada")?;

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        info!("Sending completion request to {}", self.settings.model);

        let response = self
            .client
            .post(&self.settings.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", &self.settings.site_url)
            .header("X-Title", &self.settings.app_title)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to language model API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Language model API error {}: {}", status, error_text);
            anyhow::bail!("Language model API returned error {}: {}", status, error_text);
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to parse language model API response")?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Language model API returned no message")?;

        info!("Received completion ({} chars)", content.len());
        Ok(content)
    }
}
