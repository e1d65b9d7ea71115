//! Chat wire types and the provider trait seam

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vertrag_core::TokenUsage;

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role (`system` or `user`)
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// System message
    #[inline]
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User message
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One provider request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling parameter
    pub top_p: f64,
    /// Completion token cap
    pub max_tokens: u32,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
}

/// One provider response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant message content
    pub content: String,
    /// Token accounting
    pub usage: TokenUsage,
}

/// Per-phase model settings (model, temperature, token budget)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling parameter
    pub top_p: f64,
    /// Completion token cap
    pub max_tokens: u32,
}

impl ModelSettings {
    /// Create settings
    #[inline]
    #[must_use]
    pub fn new(model: impl Into<String>, temperature: f64, top_p: f64, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            temperature,
            top_p,
            max_tokens,
        }
    }

    /// Same settings with a different temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build a request with these settings
    #[inline]
    #[must_use]
    pub fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            messages,
        }
    }
}

/// Provider trait seam
///
/// The pipeline depends only on this; concrete clients (HTTP, gated,
/// scripted test doubles) implement it.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Issue one chat completion call
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for std::sync::Arc<T> {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        (**self).complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("a").role, "system");
        assert_eq!(ChatMessage::user("b").role, "user");
    }

    #[test]
    fn settings_build_request() {
        let settings = ModelSettings::new("gpt-4o", 0.05, 0.9, 8000);
        let request = settings.request(vec![ChatMessage::user("hallo")]);
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 8000);
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn with_temperature_overrides_only_temperature() {
        let settings = ModelSettings::new("gpt-4o", 0.05, 0.9, 8000).with_temperature(0.0);
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.top_p, 0.9);
    }
}
