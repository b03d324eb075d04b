use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const CHAT_TIMEOUT: Duration = Duration::from_secs(120);
const TAGS_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Model backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for an Ollama-compatible model backend.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Reuses a pooled client; per-call timeouts are applied on each request.
    #[must_use]
    pub fn with_shared_client(client: Client, base_url: &str, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one non-streaming chat exchange and returns the assistant text.
    ///
    /// A response without `message.content` yields an empty string.
    pub async fn chat(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String, OllamaError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending chat request");

        let result = self.send_chat(&body).await;
        record_request("chat", result.is_ok());
        result
    }

    async fn send_chat(&self, body: &ChatRequest<'_>) -> Result<String, OllamaError> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(CHAT_TIMEOUT)
            .json(body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let parsed: ChatResponse = response.json().await?;

        Ok(parsed.message.map(|m| m.content).unwrap_or_default())
    }

    /// Names of the models installed on the backend.
    pub async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let result = self.fetch_tags().await;
        record_request("tags", result.is_ok());
        result
    }

    async fn fetch_tags(&self) -> Result<Vec<String>, OllamaError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await?;

        let response = check_status(response).await?;
        let parsed: TagsResponse = response.json().await?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OllamaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%status, "Model backend rejected request");
    Err(OllamaError::Status { status, body })
}

fn record_request(endpoint: &'static str, ok: bool) {
    let outcome = if ok { "success" } else { "error" };
    metrics::counter!("model_requests_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
}
