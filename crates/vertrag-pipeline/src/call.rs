//! Timeout wrapper shared by every provider call

use std::time::Duration;
use vertrag_llm::{ChatRequest, ChatResponse, LlmClient, LlmError};

/// Issue one call bounded by the configured per-call timeout
///
/// An elapsed timeout is reported as [`LlmError::Timeout`], never as an
/// indefinite hang.
pub(crate) async fn complete_with_timeout<C: LlmClient + ?Sized>(
    client: &C,
    limit: Duration,
    request: ChatRequest,
) -> Result<ChatResponse, LlmError> {
    match tokio::time::timeout(limit, client.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Timeout {
            elapsed_ms: limit.as_millis() as u64,
        }),
    }
}
