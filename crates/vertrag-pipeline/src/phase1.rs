//! Phase 1: meta-prompt generation
//!
//! One LLM call that produces generation instructions for Phase 2 plus a
//! machine-readable snapshot, delimited by fixed markers. A missing
//! marker or unparseable snapshot JSON is fatal; there is no silent
//! recovery at this stage.

use crate::call::complete_with_timeout;
use crate::config::PipelineConfig;
use crate::error::{Phase, PipelineError};
use crate::prompts::{self, PROMPT_MARKER, SNAPSHOT_MARKER};
use std::time::Instant;
use tracing::{debug, info};
use vertrag_core::{ContractTypeProfile, GenerationInput, Snapshot, TokenUsage};
use vertrag_llm::{ChatMessage, LlmClient};

/// Output of the meta-prompt phase
#[derive(Debug, Clone)]
pub struct Phase1Output {
    /// Generation instruction handed to Phase 2
    pub generated_prompt: String,
    /// Parsed snapshot, forbidden topics already allow-filtered
    pub snapshot: Snapshot,
    /// Wall-clock duration of the call
    pub timing_ms: u64,
    /// Token usage of the call
    pub usage: TokenUsage,
    /// Model that produced the prompt
    pub model: String,
}

/// Run the meta-prompt call and parse its two-section response
pub async fn run_meta_prompt<C: LlmClient + ?Sized>(
    client: &C,
    config: &PipelineConfig,
    input: &GenerationInput,
    profile: &ContractTypeProfile,
) -> Result<Phase1Output, PipelineError> {
    let started = Instant::now();
    debug!(
        role_a = %profile.roles.a,
        role_b = %profile.roles.b,
        "phase 1 started"
    );

    let request = config.phase1.request(vec![
        ChatMessage::system(prompts::phase1_system(profile)),
        ChatMessage::user(prompts::phase1_user(input, profile)),
    ]);

    let response = complete_with_timeout(client, config.call_timeout, request)
        .await
        .map_err(|e| PipelineError::llm(Phase::MetaPrompt, e))?;

    let (generated_prompt, mut snapshot) = parse_response(&response.content)?;
    snapshot.forbidden_topics = filter_forbidden_topics(profile, input, &snapshot.forbidden_topics);

    let timing_ms = started.elapsed().as_millis() as u64;
    info!(
        prompt_len = generated_prompt.len(),
        active_forbidden = snapshot.forbidden_topics.len(),
        timing_ms,
        tokens = response.usage.total_tokens,
        "phase 1 finished"
    );

    Ok(Phase1Output {
        generated_prompt,
        snapshot,
        timing_ms,
        usage: response.usage,
        model: config.phase1.model.clone(),
    })
}

/// Split the response into its instruction and snapshot sections
fn parse_response(response: &str) -> Result<(String, Snapshot), PipelineError> {
    let prompt_start = response
        .find(PROMPT_MARKER)
        .ok_or(PipelineError::MissingMarker {
            marker: PROMPT_MARKER,
        })?
        + PROMPT_MARKER.len();

    let snapshot_start =
        response[prompt_start..]
            .find(SNAPSHOT_MARKER)
            .ok_or(PipelineError::MissingMarker {
                marker: SNAPSHOT_MARKER,
            })?
            + prompt_start;

    let generated_prompt = response[prompt_start..snapshot_start].trim().to_string();
    let snapshot_section = &response[snapshot_start + SNAPSHOT_MARKER.len()..];
    let snapshot = Snapshot::from_response_section(snapshot_section)?;

    Ok((generated_prompt, snapshot))
}

/// Allow-list filtering of forbidden topics
///
/// A topic is dropped when it or any registered synonym occurs
/// case-insensitively anywhere in the raw structured input or the
/// custom-requirements text: the user asked for it, so the validator
/// must not flag it later.
fn filter_forbidden_topics(
    profile: &ContractTypeProfile,
    input: &GenerationInput,
    snapshot_topics: &[String],
) -> Vec<String> {
    let haystack = input.flattened_text();
    let active: &[String] = if snapshot_topics.is_empty() {
        &profile.forbidden_topics
    } else {
        snapshot_topics
    };

    active
        .iter()
        .filter(|topic| {
            let mentioned = haystack.contains(&topic.to_lowercase())
                || profile
                    .synonyms_for(topic)
                    .iter()
                    .any(|syn| haystack.contains(&syn.to_lowercase()));
            if mentioned {
                debug!(topic = %topic, "forbidden topic allow-listed by user input");
            }
            !mentioned
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vertrag_core::{profile_for, ContractType, Party};

    const GOOD_RESPONSE: &str = r#"===PROMPT===
Erstelle einen Mietvertrag nach BGB.
===SNAPSHOT===
```json
{
  "roles": {"A": "Vermieter", "B": "Mieter"},
  "mustClauses": ["§ 1 Mietobjekt"],
  "forbiddenTopics": ["Haustiere", "Untermiete"],
  "customRequirements": []
}
```"#;

    #[test]
    fn parse_splits_prompt_and_snapshot() {
        let (prompt, snapshot) = parse_response(GOOD_RESPONSE).unwrap();
        assert_eq!(prompt, "Erstelle einen Mietvertrag nach BGB.");
        assert_eq!(snapshot.roles.a, "Vermieter");
        assert_eq!(snapshot.forbidden_topics.len(), 2);
    }

    #[test]
    fn parse_without_prompt_marker_fails() {
        let err = parse_response("kein Format").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingMarker {
                marker: PROMPT_MARKER
            }
        ));
    }

    #[test]
    fn parse_without_snapshot_marker_fails() {
        let err = parse_response("===PROMPT===\nnur Prompt").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingMarker {
                marker: SNAPSHOT_MARKER
            }
        ));
    }

    #[test]
    fn parse_with_bad_snapshot_json_fails() {
        let response = "===PROMPT===\nText\n===SNAPSHOT===\nkein json";
        assert!(matches!(
            parse_response(response).unwrap_err(),
            PipelineError::InvalidSnapshot(_)
        ));
    }

    #[test]
    fn filter_drops_topic_mentioned_in_custom_requirements() {
        let profile = profile_for(ContractType::Mietvertrag);
        let input = GenerationInput::new(Party::new("A", "X"), Party::new("B", "Y"))
            .with_custom_requirements("Haustiere sind erlaubt");
        let active = filter_forbidden_topics(profile, &input, &profile.forbidden_topics);
        assert!(!active.contains(&"Haustiere".to_string()));
        assert!(active.contains(&"Untermiete".to_string()));
    }

    #[test]
    fn filter_drops_topic_mentioned_via_synonym() {
        let profile = profile_for(ContractType::Mietvertrag);
        let input = GenerationInput::new(Party::new("A", "X"), Party::new("B", "Y"))
            .with_custom_requirements("Tierhaltung nach Absprache");
        let active = filter_forbidden_topics(profile, &input, &profile.forbidden_topics);
        assert!(!active.contains(&"Haustiere".to_string()));
    }

    #[test]
    fn filter_scans_dynamic_fields_too() {
        let profile = profile_for(ContractType::Mietvertrag);
        let input = GenerationInput::new(Party::new("A", "X"), Party::new("B", "Y"))
            .with_field("nutzung", "teilweise gewerblich");
        let active = filter_forbidden_topics(profile, &input, &profile.forbidden_topics);
        assert!(!active.contains(&"Gewerbe".to_string()));
    }

    #[test]
    fn filter_falls_back_to_profile_when_snapshot_list_empty() {
        let profile = profile_for(ContractType::Mietvertrag);
        let input = GenerationInput::new(Party::new("A", "X"), Party::new("B", "Y"));
        let active = filter_forbidden_topics(profile, &input, &[]);
        assert_eq!(active, profile.forbidden_topics);
    }
}
