//! Chat-completions client for the hosted generative-text service.
//! The service speaks the OpenAI-compatible `/chat/completions` format.

use super::http_client::build_service_client;
use super::scrub::sanitize_error_body;
use super::traits::{ChatTransport, SendFuture};
use super::types::ChatMessage;
use crate::config::{API_KEY_ENV, ProviderConfig};
use crate::error::{ConfigError, LlmError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct ChatCompletionsClient {
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    model: String,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    timeout: Duration,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(config: &ProviderConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/');
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            cached_auth_header: config
                .api_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .map(|key| format!("Bearer {key}")),
            cached_chat_url,
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
            client: build_service_client(),
        }
    }

    /// Override the request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn chat_url(&self) -> &str {
        &self.cached_chat_url
    }

    fn build_request<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }

    fn extract_text(response: ChatResponse) -> Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::EmptyResponse.into())
    }

    fn classify(&self, error: &reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            LlmError::Network(error.to_string())
        }
    }

    async fn exchange(&self, auth_header: &str, messages: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(messages);

        let response = self
            .client
            .post(self.chat_url())
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            let body = sanitize_error_body(&body);
            tracing::warn!(status = status.as_u16(), "service returned an error: {body}");
            return Err(LlmError::Transport {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response.text().await.map_err(|e| self.classify(&e))?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;
        Self::extract_text(parsed)
    }

    async fn call(&self, messages: &[ChatMessage]) -> Result<String> {
        let auth_header = self.cached_auth_header.as_deref().ok_or(
            ConfigError::MissingCredential {
                var: API_KEY_ENV,
            },
        )?;

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            "sending chat completion request"
        );

        match tokio::time::timeout(self.timeout, self.exchange(auth_header, messages)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "chat completion request timed out"
                );
                Err(LlmError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
                .into())
            }
        }
    }
}

impl ChatTransport for ChatCompletionsClient {
    fn name(&self) -> &str {
        "chat-completions"
    }

    fn send<'a>(&'a self, messages: &'a [ChatMessage]) -> SendFuture<'a> {
        Box::pin(self.call(messages))
    }
}
