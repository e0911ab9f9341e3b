use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Credentials;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },
    #[error("completion had no message content")]
    NoContent,
}

/// Single-shot chat completion.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: CompletionConfig,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(credentials: &Credentials, config: CompletionConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .user_agent("mealie-tasks")
        .build()?;

        Ok(Self {
            http,
            config: CompletionConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            api_key: credentials.openai_key().to_string(),
        })
    }
}

#[async_trait]
impl Completer for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let req = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                Message { role: "system", content: system },
                Message { role: "user", content: prompt },
            ],
            temperature: self.config.temperature,
        };

        tracing::debug!("POST {url} (model {})", self.config.model);
        let res = self.http.post(&url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CompletionError::Upstream { status, body });
        }

        let res: ChatCompletionResponse = res.json().await?;
        res.choices.into_iter()
            .next()
            .and_then(|c| c.message.content)
        .ok_or(CompletionError::NoContent)
    }
}
