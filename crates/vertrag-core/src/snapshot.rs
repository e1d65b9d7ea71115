//! Phase-1 snapshot
//!
//! The machine-readable block produced alongside the meta-prompt. It is
//! the ground truth for the deterministic stages: the validator, the
//! repair passes, and the self-check all read from it, never from the
//! raw LLM response.

use serde::{Deserialize, Serialize};

/// Resolved role labels as emitted by Phase 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRoles {
    /// Party A label
    #[serde(rename = "A")]
    pub a: String,
    /// Party B label
    #[serde(rename = "B")]
    pub b: String,
}

/// Structured snapshot consumed by validator, repair, and self-check
///
/// Must parse from the Phase-1 `===SNAPSHOT===` section as valid JSON;
/// a parse failure is a hard pipeline failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Resolved roles (possibly overridden for the custom type)
    pub roles: SnapshotRoles,
    /// Resolved must-clause specs
    #[serde(default)]
    pub must_clauses: Vec<String>,
    /// Forbidden topics, already filtered against the user input
    #[serde(default)]
    pub forbidden_topics: Vec<String>,
    /// Custom requirements as individual entries
    #[serde(default)]
    pub custom_requirements: Vec<String>,
}

impl Snapshot {
    /// Parse the snapshot section, tolerating ```json code fences
    pub fn from_response_section(section: &str) -> Result<Self, serde_json::Error> {
        let cleaned = section
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();
        serde_json::from_str(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RAW: &str = r#"{
        "roles": {"A": "Darlehensgeber", "B": "Darlehensnehmer"},
        "mustClauses": ["§ 1 Darlehenssumme", "§ 3 Zinsregelung|Verzinsung"],
        "forbiddenTopics": ["Bürgschaft"],
        "customRequirements": ["0% Zinsen"]
    }"#;

    #[test]
    fn snapshot_parses_camel_case() {
        let snapshot = Snapshot::from_response_section(RAW).unwrap();
        assert_eq!(snapshot.roles.a, "Darlehensgeber");
        assert_eq!(snapshot.must_clauses.len(), 2);
        assert_eq!(snapshot.forbidden_topics, vec!["Bürgschaft"]);
        assert_eq!(snapshot.custom_requirements, vec!["0% Zinsen"]);
    }

    #[test]
    fn snapshot_parses_fenced_json() {
        let fenced = format!("```json\n{RAW}\n```");
        let snapshot = Snapshot::from_response_section(&fenced).unwrap();
        assert_eq!(snapshot.roles.b, "Darlehensnehmer");
    }

    #[test]
    fn snapshot_missing_optional_lists_defaults_empty() {
        let minimal = r#"{"roles": {"A": "Partei A", "B": "Partei B"}}"#;
        let snapshot = Snapshot::from_response_section(minimal).unwrap();
        assert!(snapshot.must_clauses.is_empty());
        assert!(snapshot.forbidden_topics.is_empty());
    }

    #[test]
    fn snapshot_invalid_json_is_error() {
        assert!(Snapshot::from_response_section("not json").is_err());
    }
}
