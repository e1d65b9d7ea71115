//! Self-check: the LLM critic
//!
//! Compares the final text against the Phase-1 instructions and returns
//! a structured conformance verdict. The pass is fallible here; the
//! orchestrator applies the fail-open policy so a critic outage never
//! blocks delivery of an already-validated artifact.

use crate::call::complete_with_timeout;
use crate::config::PipelineConfig;
use crate::error::{Phase, PipelineError};
use crate::prompts;
use tracing::{debug, info};
use vertrag_core::{SelfCheckReport, Snapshot, TokenUsage};
use vertrag_llm::{ChatMessage, LlmClient, LlmError};

/// Run the critic call and parse its JSON verdict
pub async fn run_self_check<C: LlmClient + ?Sized>(
    client: &C,
    config: &PipelineConfig,
    contract_text: &str,
    generated_prompt: &str,
    snapshot: &Snapshot,
) -> Result<(SelfCheckReport, TokenUsage), PipelineError> {
    debug!("self-check started");

    let request = config.self_check.request(vec![
        ChatMessage::system(prompts::self_check_system()),
        ChatMessage::user(prompts::self_check_user(
            contract_text,
            generated_prompt,
            snapshot,
        )),
    ]);

    let response = complete_with_timeout(client, config.call_timeout, request)
        .await
        .map_err(|e| PipelineError::llm(Phase::SelfCheck, e))?;

    let json = extract_json_block(&response.content).ok_or_else(|| {
        PipelineError::llm(
            Phase::SelfCheck,
            LlmError::MalformedResponse("no JSON object in self-check response".to_string()),
        )
    })?;

    let mut report: SelfCheckReport = serde_json::from_str(&json).map_err(|e| {
        PipelineError::llm(
            Phase::SelfCheck,
            LlmError::MalformedResponse(format!("self-check JSON invalid: {e}")),
        )
    })?;
    report.score = report.score.clamp(0.0, 1.0);

    info!(
        conforms = report.conforms,
        score = report.score,
        notes = report.notes.len(),
        "self-check finished"
    );
    Ok((report, response.usage))
}

/// Extract the first JSON object from a possibly fenced or prose-wrapped answer
fn extract_json_block(raw: &str) -> Option<String> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end < start {
        return None;
    }
    Some(cleaned[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extract_from_bare_json() {
        let raw = r#"{"conforms": true, "score": 0.97, "notes": []}"#;
        assert_eq!(extract_json_block(raw).unwrap(), raw);
    }

    #[test]
    fn extract_from_fenced_json() {
        let raw = "```json\n{\"conforms\": false, \"score\": 0.4, \"notes\": [\"x\"]}\n```";
        let json = extract_json_block(raw).unwrap();
        let report: SelfCheckReport = serde_json::from_str(&json).unwrap();
        assert!(!report.conforms);
    }

    #[test]
    fn extract_from_prose_wrapped_json() {
        let raw = "Hier die Bewertung:\n{\"conforms\": true, \"score\": 0.95, \"notes\": []}\nViel Erfolg!";
        let json = extract_json_block(raw).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn extract_without_object_is_none() {
        assert_eq!(extract_json_block("kein json hier"), None);
        assert_eq!(extract_json_block(""), None);
    }
}
