//! Validation and self-check reports
//!
//! The deterministic validator produces a [`ValidationReport`] with a
//! weighted score over six check categories; the LLM critic produces a
//! [`SelfCheckReport`]. Both end up in the caller-facing
//! [`GenerationOutcome`] and in the provenance record.

use serde::{Deserialize, Serialize};

/// Severity of a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Delivery-blocking; drives the retry decision
    Error,
    /// Advisory-only; never blocks delivery
    Warning,
}

/// The six validator check categories with their score weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckKind {
    /// No foreign canonical role terms present
    Roles,
    /// Every must-clause present by number or fuzzy title
    MustClauses,
    /// Paragraph numbering contiguous from § 1
    Sequencing,
    /// No forbidden topic present
    ForbiddenTopics,
    /// No month-name-style dates
    DateFormat,
    /// Currency formatting (informational)
    CurrencyFormat,
}

impl CheckKind {
    /// Score weight of this category; weights sum to 1.0
    #[inline]
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self {
            Self::Roles => 0.30,
            Self::MustClauses => 0.40,
            Self::Sequencing => 0.10,
            Self::ForbiddenTopics => 0.10,
            Self::DateFormat => 0.05,
            Self::CurrencyFormat => 0.05,
        }
    }

    /// Stable identifier used in reports
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roles => "roles",
            Self::MustClauses => "mustClauses",
            Self::Sequencing => "sequencing",
            Self::ForbiddenTopics => "forbiddenTopics",
            Self::DateFormat => "dateFormat",
            Self::CurrencyFormat => "currencyFormat",
        }
    }
}

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Whether the check passed
    pub passed: bool,
    /// Severity if failed
    pub severity: Severity,
    /// Failure message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckOutcome {
    /// Passing outcome
    #[inline]
    #[must_use]
    pub fn pass() -> Self {
        Self {
            passed: true,
            severity: Severity::Warning,
            message: None,
        }
    }

    /// Failing outcome with severity and message
    #[inline]
    #[must_use]
    pub fn fail(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            severity,
            message: Some(message.into()),
        }
    }
}

/// Per-category pass/fail record kept in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// Check category
    pub kind: CheckKind,
    /// Whether it passed
    pub passed: bool,
}

/// Result of the deterministic validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff zero error-severity checks failed
    pub passed: bool,
    /// Weighted sum over passed checks, rounded to 2 decimals, in [0, 1]
    pub score: f64,
    /// Error-severity failure messages (delivery-blocking)
    pub errors: Vec<String>,
    /// Warning-severity failure messages (advisory)
    pub warnings: Vec<String>,
    /// Per-category pass/fail breakdown
    pub checks: Vec<CheckRecord>,
}

impl ValidationReport {
    /// Assemble a report from per-category outcomes
    ///
    /// `passed` is true iff no error-severity failure; warnings never
    /// block. The score is the sum of weights of passed categories.
    #[must_use]
    pub fn from_checks(outcomes: Vec<(CheckKind, CheckOutcome)>) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut checks = Vec::with_capacity(outcomes.len());
        let mut score = 0.0;

        for (kind, outcome) in outcomes {
            if outcome.passed {
                score += kind.weight();
            } else if let Some(message) = outcome.message {
                match outcome.severity {
                    Severity::Error => errors.push(message),
                    Severity::Warning => warnings.push(message),
                }
            }
            checks.push(CheckRecord {
                kind,
                passed: outcome.passed,
            });
        }

        Self {
            passed: errors.is_empty(),
            score: (score * 100.0).round() / 100.0,
            errors,
            warnings,
            checks,
        }
    }
}

/// Conservative score assumed when the critic itself fails (fail-open)
pub const SELF_CHECK_FAIL_OPEN_SCORE: f64 = 0.85;

/// Result of the LLM critic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfCheckReport {
    /// Whether the artifact conforms to the Phase-1 instructions
    pub conforms: bool,
    /// Conformance score in [0, 1]
    pub score: f64,
    /// Critic notes
    #[serde(default)]
    pub notes: Vec<String>,
}

impl SelfCheckReport {
    /// Fail-open default used when the critic call or its JSON fails
    ///
    /// A critic outage must never block delivery of an already-validated
    /// artifact; the technical failure is recorded as a note.
    #[must_use]
    pub fn fail_open(reason: impl std::fmt::Display) -> Self {
        Self {
            conforms: true,
            score: SELF_CHECK_FAIL_OPEN_SCORE,
            notes: vec![format!("Self-Check technisch fehlgeschlagen: {reason}")],
        }
    }
}

/// Token accounting for one LLM call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Accumulate another call's usage into this one
    #[inline]
    pub fn accumulate(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Blended score summary exposed to callers and the provenance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    /// Blend of validator and critic scores
    pub final_score: f64,
    /// Deterministic validator score
    pub validator_score: f64,
    /// LLM critic score
    pub llm_score: f64,
    /// Retries consumed by the run
    pub retries_used: u32,
}

/// Transparency block attached to every completed artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineArtifacts {
    /// Score summary (blended, validator, critic, retries)
    pub self_check: ScoreSummary,
    /// Deterministic validator report
    pub validator: ValidationReport,
}

/// Caller-facing result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    /// Final contract text
    pub contract_text: String,
    /// Scores and validator annotations
    pub artifacts: PipelineArtifacts,
    /// Set when the retry budget was exhausted below the acceptance floor
    pub review_required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all_pass() -> Vec<(CheckKind, CheckOutcome)> {
        vec![
            (CheckKind::Roles, CheckOutcome::pass()),
            (CheckKind::MustClauses, CheckOutcome::pass()),
            (CheckKind::Sequencing, CheckOutcome::pass()),
            (CheckKind::ForbiddenTopics, CheckOutcome::pass()),
            (CheckKind::DateFormat, CheckOutcome::pass()),
            (CheckKind::CurrencyFormat, CheckOutcome::pass()),
        ]
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = [
            CheckKind::Roles,
            CheckKind::MustClauses,
            CheckKind::Sequencing,
            CheckKind::ForbiddenTopics,
            CheckKind::DateFormat,
            CheckKind::CurrencyFormat,
        ]
        .iter()
        .map(CheckKind::weight)
        .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn all_passing_scores_one() {
        let report = ValidationReport::from_checks(all_pass());
        assert!(report.passed);
        assert_eq!(report.score, 1.0);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn error_failure_blocks_and_reduces_score() {
        let mut checks = all_pass();
        checks[0].1 = CheckOutcome::fail(Severity::Error, "Falsche Rolle gefunden");
        let report = ValidationReport::from_checks(checks);
        assert!(!report.passed);
        assert_eq!(report.score, 0.70);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn warning_failure_does_not_block() {
        let mut checks = all_pass();
        checks[2].1 = CheckOutcome::fail(Severity::Warning, "Lücke in Paragraphen-Nummerierung");
        let report = ValidationReport::from_checks(checks);
        assert!(report.passed);
        assert_eq!(report.score, 0.90);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn self_check_fail_open_defaults() {
        let report = SelfCheckReport::fail_open("timeout");
        assert!(report.conforms);
        assert_eq!(report.score, SELF_CHECK_FAIL_OPEN_SCORE);
        assert!(report.notes[0].contains("timeout"));
    }

    #[test]
    fn token_usage_accumulates() {
        let mut total = TokenUsage::default();
        total.accumulate(TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
            total_tokens: 150,
        });
        total.accumulate(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        });
        assert_eq!(total.total_tokens, 165);
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let outcome = GenerationOutcome {
            contract_text: "§ 1 Test".to_string(),
            artifacts: PipelineArtifacts {
                self_check: ScoreSummary {
                    final_score: 0.95,
                    validator_score: 1.0,
                    llm_score: 0.9,
                    retries_used: 0,
                },
                validator: ValidationReport::from_checks(all_pass()),
            },
            review_required: false,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("contractText"));
        assert!(json.contains("finalScore"));
        assert!(json.contains("reviewRequired"));
    }
}
