//! Repair passes
//!
//! The universal pass patches validator-identified deficiencies (missing
//! clauses, numbering gaps) without shortening the text. Two
//! specializations layer on top: zero-interest loans and the free-form
//! custom type. All passes are fallible here; the orchestrator applies
//! the fail-soft policy and keeps the previous text on error.

use crate::call::complete_with_timeout;
use crate::error::{Phase, PipelineError};
use crate::prompts;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::debug;
use vertrag_core::{Snapshot, TokenUsage};
use vertrag_llm::{ChatMessage, LlmClient, ModelSettings};

static ZERO_INTEREST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b0\s*%|zinsfrei|zinslos|ohne\s+Zinsen").unwrap());

/// Whether the custom-requirements text asks for an interest-free loan
#[must_use]
pub fn wants_zero_interest(custom_requirements: &str) -> bool {
    ZERO_INTEREST_RE.is_match(custom_requirements)
}

/// Repaired text plus the tokens the pass consumed
pub type PassOutput = (String, TokenUsage);

/// Universal repair: insert missing must-clauses, renumber contiguously
pub async fn universal<C: LlmClient + ?Sized>(
    client: &C,
    call_timeout: Duration,
    settings: &ModelSettings,
    contract_text: &str,
    snapshot: &Snapshot,
) -> Result<PassOutput, PipelineError> {
    debug!("universal repair pass started");
    run_pass(
        client,
        call_timeout,
        settings,
        Phase::Repair,
        prompts::repair_system(),
        prompts::repair_user(contract_text, snapshot),
        contract_text,
    )
    .await
}

/// Loan specialization: force an explicit interest-free clause
pub async fn loan<C: LlmClient + ?Sized>(
    client: &C,
    call_timeout: Duration,
    settings: &ModelSettings,
    contract_text: &str,
) -> Result<PassOutput, PipelineError> {
    debug!("loan specialization pass started");
    run_pass(
        client,
        call_timeout,
        settings,
        Phase::Specialization,
        prompts::repair_system(),
        prompts::loan_repair_user(contract_text),
        contract_text,
    )
    .await
}

/// Custom-type specialization: enforce overridden roles and clause titles
pub async fn individuell<C: LlmClient + ?Sized>(
    client: &C,
    call_timeout: Duration,
    settings: &ModelSettings,
    contract_text: &str,
    snapshot: &Snapshot,
) -> Result<PassOutput, PipelineError> {
    debug!("custom-type specialization pass started");
    run_pass(
        client,
        call_timeout,
        settings,
        Phase::Specialization,
        prompts::repair_system(),
        prompts::individuell_repair_user(contract_text, snapshot),
        contract_text,
    )
    .await
}

async fn run_pass<C: LlmClient + ?Sized>(
    client: &C,
    call_timeout: Duration,
    settings: &ModelSettings,
    phase: Phase,
    system: String,
    user: String,
    previous_text: &str,
) -> Result<PassOutput, PipelineError> {
    let request = settings.request(vec![ChatMessage::system(system), ChatMessage::user(user)]);
    let response = complete_with_timeout(client, call_timeout, request)
        .await
        .map_err(|e| PipelineError::llm(phase, e))?;

    // An empty answer repairs nothing; keep the previous text.
    let text = if response.content.trim().is_empty() {
        previous_text.to_string()
    } else {
        response.content
    };
    Ok((text, response.usage))
}
