//! Fixture builders
//!
//! Canned Phase-1 responses, contract texts, and inputs used across the
//! pipeline integration tests.

use serde_json::json;
use vertrag_core::{GenerationInput, Party};

/// Assemble a well-formed Phase-1 response with markers and snapshot
#[must_use]
pub fn phase1_response(
    role_a: &str,
    role_b: &str,
    must_clauses: &[&str],
    forbidden_topics: &[&str],
    custom_requirements: &[&str],
) -> String {
    let snapshot = json!({
        "roles": {"A": role_a, "B": role_b},
        "mustClauses": must_clauses,
        "forbiddenTopics": forbidden_topics,
        "customRequirements": custom_requirements,
    });
    format!(
        "===PROMPT===\nErstelle einen {role_a}/{role_b}-Vertrag nach BGB mit allen Pflichtklauseln.\n===SNAPSHOT===\n```json\n{}\n```",
        serde_json::to_string_pretty(&snapshot).unwrap()
    )
}

/// Contract text with the given numbered sections and role mentions
#[must_use]
pub fn contract_text(role_a: &str, role_b: &str, sections: &[(u32, &str)]) -> String {
    let mut text = format!("VERTRAG\n\nzwischen {role_a} und {role_b}.\n\n");
    for (number, title) in sections {
        text.push_str(&format!(
            "§ {number} {title}\nDie Parteien vereinbaren hierzu das Folgende in ausformulierter Form. \
             Weitere Einzelheiten ergeben sich aus den Eingaben.\n\n"
        ));
    }
    text
}

/// Complete loan contract including the interest-free clause
#[must_use]
pub fn darlehen_contract_text() -> String {
    contract_text(
        "Darlehensgeber",
        "Darlehensnehmer",
        &[
            (1, "Darlehenssumme"),
            (2, "Auszahlung"),
            (3, "Zinsregelung"),
            (4, "Rückzahlung"),
            (5, "Sicherheiten"),
            (6, "Kündigung"),
            (7, "Schlussbestimmungen"),
        ],
    )
}

/// Phase-1 response for the zero-interest loan scenario
#[must_use]
pub fn darlehen_phase1_response() -> String {
    phase1_response(
        "Darlehensgeber",
        "Darlehensnehmer",
        &[
            "§ 1 Darlehenssumme|Darlehensbetrag",
            "§ 2 Auszahlung",
            "§ 3 Zinsregelung|Verzinsung",
            "§ 4 Rückzahlung|Tilgung",
            "§ 5 Sicherheiten",
            "§ 6 Kündigung",
            "§ 7 Schlussbestimmungen",
        ],
        &["Bürgschaft", "Grundschuld"],
        &["0% Zinsen"],
    )
}

/// Self-check verdict JSON as the critic would return it
#[must_use]
pub fn self_check_json(conforms: bool, score: f64) -> String {
    json!({
        "conforms": conforms,
        "score": score,
        "notes": []
    })
    .to_string()
}

/// Loan input matching the end-to-end scenario
#[must_use]
pub fn darlehen_input() -> GenerationInput {
    GenerationInput::new(
        Party::new("A GmbH", "Industriestraße 9, 60311 Frankfurt"),
        Party::new("B", "Gartenweg 2, 04109 Leipzig"),
    )
    .with_field("darlehenssumme", "25.000,00 EUR")
    .with_custom_requirements("0% Zinsen")
}

/// Rental input with an allow-listed forbidden topic
#[must_use]
pub fn miet_input() -> GenerationInput {
    GenerationInput::new(
        Party::new("Max Mustermann", "Hauptstraße 1, 10115 Berlin"),
        Party::new("Erika Beispiel", "Nebenstraße 5, 20095 Hamburg"),
    )
    .with_field("kaltmiete", "850 EUR")
    .with_custom_requirements("Haustiere sind erlaubt")
}
