//! Vertrag test support
//!
//! Deterministic stand-ins for the external collaborators:
//! - [`ScriptedClient`]: an [`LlmClient`] that replays queued responses
//!   and records every request it receives
//! - [`MemorySink`]: a provenance sink backed by a `Vec`
//! - Fixture builders for Phase-1 responses, contract texts, and inputs

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod fixtures;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use vertrag_core::{GenerationRecord, TokenUsage};
use vertrag_llm::{ChatRequest, ChatResponse, LlmClient, LlmError};
use vertrag_pipeline::ProvenanceSink;

/// Token usage attached to every scripted response
pub const SCRIPTED_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 100,
    completion_tokens: 50,
    total_tokens: 150,
};

/// [`LlmClient`] that replays queued results in order
///
/// When the script runs dry, further calls fail with a malformed-response
/// error so an over-calling pipeline fails loudly instead of hanging.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    /// Empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response with the given content
    pub fn push_content(&self, content: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(ChatResponse {
            content: content.into(),
            usage: SCRIPTED_USAGE,
        }));
    }

    /// Queue a failing call
    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Requests received so far, in call order
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::MalformedResponse(
                    "scripted client exhausted".to_string(),
                ))
            })
    }
}

/// In-memory provenance sink
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<GenerationRecord>>,
}

impl MemorySink {
    /// Empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records written so far
    #[must_use]
    pub fn records(&self) -> Vec<GenerationRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProvenanceSink for MemorySink {
    async fn record(&self, record: &GenerationRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
