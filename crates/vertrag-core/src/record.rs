//! Provenance record
//!
//! Everything the pipeline learned about one run, written exactly once to
//! the document store when the orchestrator reaches its terminal state.

use crate::input::GenerationInput;
use crate::profile::ContractType;
use crate::report::{ScoreSummary, SelfCheckReport, TokenUsage, ValidationReport};
use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique generation-request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase-1 output kept for provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase1Provenance {
    /// Generation instruction handed to Phase 2
    pub generated_prompt: String,
    /// Machine-readable snapshot
    pub snapshot: Snapshot,
    /// Wall-clock duration of the call
    pub timing_ms: u64,
    /// Token usage of the call
    pub token_count: TokenUsage,
    /// Model that produced the prompt
    pub model: String,
}

/// Phase-2 output kept for provenance
///
/// Reflects the last successful generation call; an escalated
/// regeneration replaces the values of the initial attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase2Provenance {
    /// Wall-clock duration of the call
    pub timing_ms: u64,
    /// Token usage of the call
    pub token_count: TokenUsage,
    /// Model that generated the text
    pub model: String,
    /// Temperature the call ran at
    pub temperature: f64,
}

/// Write-once provenance document for a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    /// Request identifier (document key)
    pub request_id: RequestId,
    /// Contract type generated
    pub contract_type: ContractType,
    /// Batch-harness attribution label, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_label: Option<String>,
    /// Input echo
    pub input: GenerationInput,
    /// Phase-1 artifacts
    pub phase1: Phase1Provenance,
    /// Phase-2 artifacts (last successful generation call)
    pub phase2: Phase2Provenance,
    /// Final contract text
    pub contract_text: String,
    /// Deterministic validator result
    pub validator: ValidationReport,
    /// Critic result
    pub self_check: SelfCheckReport,
    /// Blended score summary
    pub scores: ScoreSummary,
    /// Whether human review is required
    pub review_required: bool,
    /// Aggregate token usage over all calls
    pub total_usage: TokenUsage,
    /// Total wall-clock duration
    pub duration_ms: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn request_id_displays_as_ulid() {
        let id = RequestId::new();
        assert_eq!(id.to_string().len(), 26);
    }

    #[test]
    fn phase2_provenance_serializes_camel_case() {
        let phase2 = Phase2Provenance {
            timing_ms: 1200,
            token_count: TokenUsage::default(),
            model: "gpt-4o".to_string(),
            temperature: 0.05,
        };
        let json = serde_json::to_string(&phase2).unwrap();
        assert!(json.contains("timingMs"));
        assert!(json.contains("tokenCount"));
    }
}
