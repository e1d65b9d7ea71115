//! Pipeline error taxonomy and the phase failure-policy table
//!
//! Every phase reports failures through [`PipelineError`]; what a
//! failure means is decided centrally by [`FailurePolicy`], not by
//! ad-hoc branching inside each phase.

use vertrag_llm::LlmError;

/// Pipeline phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Phase 1: meta-prompt generation
    MetaPrompt,
    /// Phase 2: contract text generation
    Generate,
    /// Universal repair pass
    Repair,
    /// Loan / custom-type specialization passes
    Specialization,
    /// LLM critic
    SelfCheck,
}

impl Phase {
    /// Stable identifier used in logs and error messages
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetaPrompt => "meta_prompt",
            Self::Generate => "generate",
            Self::Repair => "repair",
            Self::Specialization => "specialization",
            Self::SelfCheck => "self_check",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the orchestrator reacts when a phase fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Propagate the error to the caller, no artifact is produced
    Abort,
    /// Continue with the pre-phase text (fail-soft)
    FallbackToPrevious,
    /// Continue with a conservative default result (fail-open)
    FallbackToDefault,
}

impl FailurePolicy {
    /// The policy table: one row per phase
    #[inline]
    #[must_use]
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::MetaPrompt | Phase::Generate => Self::Abort,
            Phase::Repair | Phase::Specialization => Self::FallbackToPrevious,
            Phase::SelfCheck => Self::FallbackToDefault,
        }
    }
}

/// Errors surfaced to the caller of the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Phase-1 response missed a required section marker
    #[error("phase 1 response missing marker {marker}")]
    MissingMarker { marker: &'static str },

    /// Phase-1 snapshot section was not valid JSON
    #[error("phase 1 snapshot is not valid JSON: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    /// An LLM call failed in a phase whose policy is abort
    #[error("llm call failed during {phase}: {source}")]
    LlmCall {
        phase: Phase,
        #[source]
        source: LlmError,
    },
}

impl PipelineError {
    /// Wrap a provider error with its phase
    #[inline]
    #[must_use]
    pub fn llm(phase: Phase, source: LlmError) -> Self {
        Self::LlmCall { phase, source }
    }

    /// Phase this error originated from
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::MissingMarker { .. } | Self::InvalidSnapshot(_) => Phase::MetaPrompt,
            Self::LlmCall { phase, .. } => *phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table_rows() {
        assert_eq!(
            FailurePolicy::for_phase(Phase::MetaPrompt),
            FailurePolicy::Abort
        );
        assert_eq!(
            FailurePolicy::for_phase(Phase::Generate),
            FailurePolicy::Abort
        );
        assert_eq!(
            FailurePolicy::for_phase(Phase::Repair),
            FailurePolicy::FallbackToPrevious
        );
        assert_eq!(
            FailurePolicy::for_phase(Phase::Specialization),
            FailurePolicy::FallbackToPrevious
        );
        assert_eq!(
            FailurePolicy::for_phase(Phase::SelfCheck),
            FailurePolicy::FallbackToDefault
        );
    }

    #[test]
    fn marker_error_names_marker() {
        let err = PipelineError::MissingMarker {
            marker: "===PROMPT===",
        };
        assert!(err.to_string().contains("===PROMPT==="));
        assert_eq!(err.phase(), Phase::MetaPrompt);
    }

    #[test]
    fn llm_error_carries_phase() {
        let err = PipelineError::llm(Phase::Generate, LlmError::Timeout { elapsed_ms: 1000 });
        assert_eq!(err.phase(), Phase::Generate);
        assert!(err.to_string().contains("generate"));
    }
}
