//! OpenAI-compatible HTTP client
//!
//! Speaks the `/chat/completions` wire format over reqwest. Rate-limit
//! responses and timeouts are mapped to dedicated error variants so the
//! gate wrapper and the orchestrator can react to them.

use crate::client::{ChatMessage, ChatRequest, ChatResponse, LlmClient};
use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;
use vertrag_core::TokenUsage;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// HTTP client for an OpenAI-compatible chat completion endpoint
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: WireUsage,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: String,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAiClient {
    /// Create a client against the default OpenAI endpoint
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (no trailing slash needed)
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// With a per-call timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn map_transport_error(err: reqwest::Error, started: Instant) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
            }
        } else {
            LlmError::Http(err)
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = WireRequest {
            model: &request.model,
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
            messages: &request.messages,
        };

        debug!(model = %request.model, url = %url, "issuing chat completion");
        let started = Instant::now();

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(e, started))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            let retry_after_ms = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000);
            return Err(LlmError::RateLimited { retry_after_ms });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let wire: WireResponse = resp
            .json()
            .await
            .map_err(|e| Self::map_transport_error(e, started))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("empty choices array".to_string()))?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_tokens = wire.usage.total_tokens,
            "chat completion finished"
        );

        Ok(ChatResponse {
            content: choice.message.content,
            usage: TokenUsage {
                prompt_tokens: wire.usage.prompt_tokens,
                completion_tokens: wire.usage.completion_tokens,
                total_tokens: wire.usage.total_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = OpenAiClient::with_base_url("key", "http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn wire_request_serializes_provider_shape() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let payload = WireRequest {
            model: "gpt-4o-mini",
            temperature: 0.25,
            top_p: 0.9,
            max_tokens: 2000,
            messages: &messages,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn wire_response_parses_usage() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "§ 1 Test"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        }"#;
        let wire: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(wire.choices[0].message.content, "§ 1 Test");
        assert_eq!(wire.usage.total_tokens, 19);
    }
}
