//! Deterministic validator
//!
//! Pure rule checks over the final contract text, driven by the Phase-1
//! snapshot and the contract-type profile. Produces a weighted
//! [`ValidationReport`]; warnings are advisory, only error-severity
//! failures block delivery.

use crate::fuzzy;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use vertrag_core::{
    canonical_role_terms, CheckKind, CheckOutcome, ContractTypeProfile, MustClause, Severity,
    Snapshot, ValidationReport,
};

static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"§\s*(\d+)").unwrap());

static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d{1,2}\.?\s*(?:Januar|Februar|März|April|Mai|Juni|Juli|August|September|Oktober|November|Dezember)\s+\d{4}",
    )
    .unwrap()
});

/// Run all six checks and assemble the weighted report
///
/// Idempotent: the same (text, snapshot, profile) triple always yields
/// the same report.
#[must_use]
pub fn validate(
    text: &str,
    snapshot: &Snapshot,
    profile: &ContractTypeProfile,
) -> ValidationReport {
    let normalized = fuzzy::normalize(text);
    let numbers = paragraph_numbers(text);

    ValidationReport::from_checks(vec![
        (CheckKind::Roles, check_roles(text, profile)),
        (
            CheckKind::MustClauses,
            check_must_clauses(&normalized, &numbers, snapshot, profile),
        ),
        (CheckKind::Sequencing, check_sequencing(&numbers)),
        (
            CheckKind::ForbiddenTopics,
            check_forbidden_topics(text, snapshot),
        ),
        (CheckKind::DateFormat, check_date_format(text)),
        // Informational only; formatting guidance lives in the prompts.
        (CheckKind::CurrencyFormat, CheckOutcome::pass()),
    ])
}

fn paragraph_numbers(text: &str) -> BTreeSet<u32> {
    PARAGRAPH_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Canonical role terms not designated for this contract must be absent
///
/// The allowed pair comes from the resolved profile, not the snapshot:
/// the snapshot's role labels are LLM-emitted and may themselves be the
/// defect this check exists to catch.
fn check_roles(text: &str, profile: &ContractTypeProfile) -> CheckOutcome {
    let offenders: Vec<&str> = canonical_role_terms()
        .iter()
        .filter(|term| **term != profile.roles.a && **term != profile.roles.b)
        .filter(|term| text.contains(**term))
        .copied()
        .collect();

    if offenders.is_empty() {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail(
            Severity::Error,
            format!(
                "Falsche Rollenbezeichnung gefunden: {} (erlaubt: {} und {})",
                offenders.join(", "),
                profile.roles.a,
                profile.roles.b
            ),
        )
    }
}

/// Number-or-title leniency: either the literal `§ N` or any fuzzy
/// title variant satisfies a clause. Tolerates renumbered texts.
fn check_must_clauses(
    normalized_text: &str,
    numbers: &BTreeSet<u32>,
    snapshot: &Snapshot,
    profile: &ContractTypeProfile,
) -> CheckOutcome {
    let clauses: Vec<MustClause> = if snapshot.must_clauses.is_empty() {
        profile.must_clauses.clone()
    } else {
        snapshot
            .must_clauses
            .iter()
            .map(|s| MustClause::parse(s).unwrap_or_else(|_| MustClause::title_only(s)))
            .collect()
    };

    let missing: Vec<String> = clauses
        .iter()
        .filter(|clause| {
            let by_number = clause.number > 0 && numbers.contains(&clause.number);
            let by_title = clause
                .titles
                .iter()
                .any(|title| fuzzy::normalized_contains(normalized_text, title));
            !(by_number || by_title)
        })
        .map(MustClause::spec_string)
        .collect();

    if missing.is_empty() {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail(
            Severity::Error,
            format!("Fehlende Pflichtklauseln: {}", missing.join(", ")),
        )
    }
}

/// Paragraph numbering must be contiguous from § 1; a gap is advisory
fn check_sequencing(numbers: &BTreeSet<u32>) -> CheckOutcome {
    if let Some(max) = numbers.iter().next_back().copied() {
        for n in 1..=max {
            if !numbers.contains(&n) {
                return CheckOutcome::fail(
                    Severity::Warning,
                    format!("Lücke in Paragraphen-Nummerierung: § {n} fehlt"),
                );
            }
        }
    }
    CheckOutcome::pass()
}

/// Forbidden topics were already allow-filtered at snapshot time, so
/// any remaining topic found in the text is a hard failure.
fn check_forbidden_topics(text: &str, snapshot: &Snapshot) -> CheckOutcome {
    let offenders: Vec<&str> = snapshot
        .forbidden_topics
        .iter()
        .filter(|topic| topic_mentioned(text, topic))
        .map(String::as_str)
        .collect();

    if offenders.is_empty() {
        CheckOutcome::pass()
    } else {
        CheckOutcome::fail(
            Severity::Error,
            format!("Verbotene Themen gefunden: {}", offenders.join(", ")),
        )
    }
}

fn topic_mentioned(text: &str, topic: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\w*", regex::escape(topic));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => text.to_lowercase().contains(&topic.to_lowercase()),
    }
}

/// Month-name dates are a warning; ISO dates are preferred but not required
fn check_date_format(text: &str) -> CheckOutcome {
    match MONTH_DATE_RE.find(text) {
        Some(found) => CheckOutcome::fail(
            Severity::Warning,
            format!(
                "Datumsangabe mit Monatsnamen gefunden: \"{}\" (ISO-Format empfohlen)",
                found.as_str()
            ),
        ),
        None => CheckOutcome::pass(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use vertrag_core::{profile_for, ContractType, SnapshotRoles};

    fn snapshot_for(profile: &ContractTypeProfile) -> Snapshot {
        Snapshot {
            roles: SnapshotRoles {
                a: profile.roles.a.clone(),
                b: profile.roles.b.clone(),
            },
            must_clauses: profile.must_clause_specs(),
            forbidden_topics: profile.forbidden_topics.clone(),
            custom_requirements: Vec::new(),
        }
    }

    fn darlehen_text() -> String {
        let mut text = String::from("DARLEHENSVERTRAG\n\nzwischen Darlehensgeber und Darlehensnehmer.\n\n");
        for (n, title) in [
            (1, "Darlehenssumme"),
            (2, "Auszahlung"),
            (3, "Zinsregelung"),
            (4, "Rückzahlung"),
            (5, "Sicherheiten"),
            (6, "Kündigung"),
            (7, "Schlussbestimmungen"),
        ] {
            text.push_str(&format!("§ {n} {title}\nAusführlicher Klauseltext.\n\n"));
        }
        text
    }

    #[test]
    fn conforming_text_scores_one() {
        let profile = profile_for(ContractType::Darlehen);
        let report = validate(&darlehen_text(), &snapshot_for(profile), profile);
        assert!(report.passed, "errors: {:?}", report.errors);
        assert_eq!(report.score, 1.0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn must_clause_satisfied_by_number_alone() {
        let profile = profile_for(ContractType::Freelancer);
        let mut snapshot = snapshot_for(profile);
        snapshot.must_clauses = vec!["§ 3 Vergütung|Honorar".to_string()];
        let report = validate(
            "§ 1 Anfang\n§ 2 Mitte\n§ 3 Bezahlung\nText.",
            &snapshot,
            profile,
        );
        assert!(!report
            .errors
            .iter()
            .any(|e| e.contains("Fehlende Pflichtklauseln")));
    }

    #[test]
    fn must_clause_satisfied_by_title_alone() {
        let profile = profile_for(ContractType::Freelancer);
        let mut snapshot = snapshot_for(profile);
        snapshot.must_clauses = vec!["§ 3 Vergütung|Honorar".to_string()];
        let report = validate("Das Honorar beträgt 5.000 EUR.", &snapshot, profile);
        assert!(!report
            .errors
            .iter()
            .any(|e| e.contains("Fehlende Pflichtklauseln")));
    }

    #[test]
    fn must_clause_missing_is_listed_error() {
        let profile = profile_for(ContractType::Freelancer);
        let mut snapshot = snapshot_for(profile);
        snapshot.must_clauses = vec!["§ 3 Vergütung|Honorar".to_string()];
        let report = validate("§ 1 Einleitung\nText ohne Bezahlregelung.", &snapshot, profile);
        assert!(!report.passed);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("§ 3 Vergütung|Honorar")));
    }

    #[test]
    fn paragraph_gap_is_warning_not_error() {
        let profile = profile_for(ContractType::Individuell);
        let snapshot = snapshot_for(profile);
        let report = validate(
            "§ 1 Vertragsgegenstand\nPflichten der Parteien, Vergütung, Laufzeit, Kündigung, Vertraulichkeit, Schlussbestimmungen.\n§ 3 Vergütung",
            &snapshot,
            profile,
        );
        assert!(report
            .warnings
            .iter()
            .any(|w| w == "Lücke in Paragraphen-Nummerierung: § 2 fehlt"));
        assert!(report.passed, "errors: {:?}", report.errors);
    }

    #[test]
    fn foreign_role_term_costs_at_least_roles_weight() {
        let profile = profile_for(ContractType::Freelancer);
        let snapshot = snapshot_for(profile);
        let mut text = darlehen_text().replace("Darlehensgeber", "Auftraggeber");
        text = text.replace("Darlehensnehmer", "Auftragnehmer");
        text.push_str("\nDer Vermieter übergibt die Schlüssel.\n");
        let report = validate(&text, &snapshot, profile);
        assert!(!report.passed);
        assert!(report.errors.iter().any(|e| e.contains("Vermieter")));
        assert!(report.score <= 1.0 - CheckKind::Roles.weight() + 1e-9);
    }

    #[test]
    fn roles_check_trusts_profile_over_snapshot() {
        let profile = profile_for(ContractType::Mietvertrag);
        let mut snapshot = snapshot_for(profile);
        // A garbled snapshot must not shift which terms count as foreign.
        snapshot.roles.a = "Verkäufer".to_string();

        let report = validate(&miet_text(), &snapshot, profile);
        assert!(!report
            .errors
            .iter()
            .any(|e| e.contains("Rollenbezeichnung")));

        let tainted = format!("{}\nDer Verkäufer haftet nicht.", miet_text());
        let report = validate(&tainted, &snapshot, profile);
        assert!(report.errors.iter().any(|e| e.contains("Verkäufer")));
        assert!(report.errors.iter().any(|e| e.contains("erlaubt: Vermieter und Mieter")));
    }

    #[test]
    fn allow_filtered_topic_is_not_flagged() {
        let profile = profile_for(ContractType::Mietvertrag);
        let mut snapshot = snapshot_for(profile);
        // "Haustiere" was removed from the snapshot at Phase-1 filtering time.
        snapshot.forbidden_topics.retain(|t| t != "Haustiere");
        let text = format!("{}\n§ 8 Haustiere sind nach Absprache erlaubt.", miet_text());
        let report = validate(&text, &snapshot, profile);
        assert!(!report.errors.iter().any(|e| e.contains("Haustiere")));
    }

    #[test]
    fn remaining_forbidden_topic_is_error() {
        let profile = profile_for(ContractType::Mietvertrag);
        let snapshot = snapshot_for(profile);
        let text = format!("{}\nUntermiete ist gestattet.", miet_text());
        let report = validate(&text, &snapshot, profile);
        assert!(!report.passed);
        assert!(report.errors.iter().any(|e| e.contains("Untermiete")));
    }

    #[test]
    fn forbidden_topic_matches_inflected_form() {
        let profile = profile_for(ContractType::Mietvertrag);
        let snapshot = snapshot_for(profile);
        let text = format!("{}\nGewerbetreibende sind willkommen.", miet_text());
        let report = validate(&text, &snapshot, profile);
        assert!(report.errors.iter().any(|e| e.contains("Gewerbe")));
    }

    #[test]
    fn month_name_date_is_warning() {
        let profile = profile_for(ContractType::Darlehen);
        let snapshot = snapshot_for(profile);
        let text = format!("{}\nAuszahlung am 15. März 2026.", darlehen_text());
        let report = validate(&text, &snapshot, profile);
        assert!(report.passed);
        assert!(report.warnings.iter().any(|w| w.contains("15. März 2026")));
    }

    #[test]
    fn empty_snapshot_clauses_fall_back_to_profile() {
        let profile = profile_for(ContractType::Darlehen);
        let mut snapshot = snapshot_for(profile);
        snapshot.must_clauses = Vec::new();
        let report = validate("Kein Vertragstext.", &snapshot, profile);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("Fehlende Pflichtklauseln")));
    }

    fn miet_text() -> String {
        let mut text = String::from("MIETVERTRAG\n\nzwischen Vermieter und Mieter.\n\n");
        for (n, title) in [
            (1, "Mietobjekt"),
            (2, "Mietzeit"),
            (3, "Miete"),
            (4, "Nebenkosten"),
            (5, "Kaution"),
            (6, "Schönheitsreparaturen"),
            (7, "Kündigung"),
            (8, "Schlussbestimmungen"),
        ] {
            text.push_str(&format!("§ {n} {title}\nKlauseltext.\n\n"));
        }
        text
    }

    proptest! {
        #[test]
        fn validator_is_idempotent_and_bounded(text in "[a-zA-Z0-9äöüß §.,\n]{0,400}") {
            let profile = profile_for(ContractType::Kaufvertrag);
            let snapshot = snapshot_for(profile);
            let first = validate(&text, &snapshot, profile);
            let second = validate(&text, &snapshot, profile);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.score >= 0.0 && first.score <= 1.0);
        }
    }
}
