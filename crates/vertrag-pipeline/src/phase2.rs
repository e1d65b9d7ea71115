//! Phase 2: contract text generation
//!
//! One low-temperature LLM call that expands the Phase-1 instructions
//! into full contract prose. Provider errors are wrapped with phase
//! context and surfaced; no fallback text is ever synthesized here.

use crate::call::complete_with_timeout;
use crate::error::{Phase, PipelineError};
use crate::prompts;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use vertrag_core::{GenerationInput, TokenUsage};
use vertrag_llm::{ChatMessage, LlmClient, ModelSettings};

/// Output of one generation call
#[derive(Debug, Clone)]
pub struct Phase2Output {
    /// Raw contract text, before placeholder back-substitution
    pub contract_text: String,
    /// Wall-clock duration of the call
    pub timing_ms: u64,
    /// Token usage of the call
    pub usage: TokenUsage,
    /// Model that generated the text
    pub model: String,
    /// Temperature the call ran at
    pub temperature: f64,
}

/// Run one generation call with the given settings
///
/// The orchestrator passes the regular Phase-2 settings on the first
/// attempt and a temperature-0.0 variant on regeneration retries.
pub async fn run_generation<C: LlmClient + ?Sized>(
    client: &C,
    call_timeout: Duration,
    settings: &ModelSettings,
    generated_prompt: &str,
    input: &GenerationInput,
) -> Result<Phase2Output, PipelineError> {
    let started = Instant::now();
    debug!(
        prompt_len = generated_prompt.len(),
        temperature = settings.temperature,
        "phase 2 started"
    );

    let request = settings.request(vec![
        ChatMessage::system(prompts::phase2_system()),
        ChatMessage::user(prompts::phase2_user(generated_prompt, input)),
    ]);

    let response = complete_with_timeout(client, call_timeout, request)
        .await
        .map_err(|e| PipelineError::llm(Phase::Generate, e))?;

    let timing_ms = started.elapsed().as_millis() as u64;
    info!(
        text_len = response.content.len(),
        timing_ms,
        tokens = response.usage.total_tokens,
        "phase 2 finished"
    );

    Ok(Phase2Output {
        contract_text: response.content,
        timing_ms,
        usage: response.usage,
        model: settings.model.clone(),
        temperature: settings.temperature,
    })
}
