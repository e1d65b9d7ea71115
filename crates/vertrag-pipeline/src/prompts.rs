//! Prompt construction
//!
//! All German prompt text lives here; the phases only assemble messages.
//! Phase 1 asks for generation instructions plus a snapshot block, Phase 2
//! expands those instructions under the fixed fourteen-section template.

use vertrag_core::{ContractTypeProfile, GenerationInput, Snapshot};

/// Marker opening the instruction section of the Phase-1 response
pub const PROMPT_MARKER: &str = "===PROMPT===";
/// Marker opening the snapshot section of the Phase-1 response
pub const SNAPSHOT_MARKER: &str = "===SNAPSHOT===";

/// The fixed fourteen-section skeleton every contract must follow
pub const SECTION_TEMPLATE: [&str; 14] = [
    "Präambel",
    "Vertragsgegenstand",
    "Pflichten der Parteien",
    "Vergütung und Zahlungsbedingungen",
    "Laufzeit und Beginn",
    "Kündigung",
    "Gewährleistung",
    "Haftung",
    "Vertraulichkeit",
    "Datenschutz",
    "Höhere Gewalt",
    "Gerichtsstand und anwendbares Recht",
    "Salvatorische Klausel",
    "Schlussbestimmungen",
];

/// Sentinel injected for mandatory fields the user left empty
pub const MISSING_FIELD: &str = "[NAME FEHLT]";

/// System instruction for Phase 1
#[must_use]
pub fn phase1_system(profile: &ContractTypeProfile) -> String {
    format!(
        "Du bist Fachanwalt für deutsches Vertragsrecht (BGB) mit 20+ Jahren Erfahrung.\n\n\
         Deine Aufgabe: Erzeuge ausschließlich einen optimalen Prompt-Text, mit dem du selbst \
         in Phase 2 den Vertrag korrekt generierst.\n\n\
         Wichtige Regeln:\n\
         - Verwende EXAKT die korrekten Rollenbegriffe für diesen Vertragstyp: {role_a} und {role_b}\n\
         - Füge KEINE Themen hinzu, die nicht in den Eingaben stehen\n\
         - Verwende professionelle juristische Sprache\n\
         - Nummerierte Paragraphen (§ 1, § 2, ...)\n\
         - Deutsche Schreibweise (BGB-konform)\n\n\
         Output-Format (strikt einhalten!):\n\
         {prompt_marker}\n\
         [VOLLSTÄNDIGER Prompt-Text für Phase 2]\n\
         {snapshot_marker}\n\
         {{\n\
           \"roles\": {{\"A\": \"{role_a}\", \"B\": \"{role_b}\"}},\n\
           \"mustClauses\": [...],\n\
           \"forbiddenTopics\": [...],\n\
           \"customRequirements\": [...]\n\
         }}",
        role_a = profile.roles.a,
        role_b = profile.roles.b,
        prompt_marker = PROMPT_MARKER,
        snapshot_marker = SNAPSHOT_MARKER,
    )
}

/// User message for Phase 1: deterministic summary of the structured input
#[must_use]
pub fn phase1_user(input: &GenerationInput, profile: &ContractTypeProfile) -> String {
    let role_a = &profile.roles.a;
    let role_b = &profile.roles.b;

    let mut prompt = format!("VERTRAGSTYP: {role_a}/{role_b}-Vertrag (DE, BGB)\n\n");
    prompt.push_str("EINGABEN:\n");
    prompt.push_str(&format!("- {role_a}: {}\n", name_or_missing(&input.partei_a.name)));
    prompt.push_str(&format!("  Anschrift: {}\n", input.partei_a.address));
    prompt.push_str(&format!("- {role_b}: {}\n", name_or_missing(&input.partei_b.name)));
    prompt.push_str(&format!("  Anschrift: {}\n", input.partei_b.address));

    for (key, value) in &input.fields {
        prompt.push_str(&format!("- {key}: {value}\n"));
    }

    if !input.custom_requirements.is_empty() {
        prompt.push_str(&format!(
            "\nINDIVIDUELLE VEREINBARUNGEN:\n{}\n",
            input.custom_requirements
        ));
    }

    let clause_preview: Vec<String> = profile
        .must_clause_specs()
        .into_iter()
        .take(3)
        .collect();

    prompt.push_str("\nERWARTE:\n");
    prompt.push_str(
        "1) Optimalen Prompt-Text für die Vertragserstellung (Phase 2, juristische Sprache, §§, keine Platzhalter)\n",
    );
    prompt.push_str("2) Snapshot-Objekt mit: roles, mustClauses, forbiddenTopics, customRequirements\n\n");
    prompt.push_str("REGELN:\n");
    prompt.push_str(&format!(
        "- Nur relevante Klauseln (aus: {}...)\n",
        clause_preview.join(", ")
    ));
    prompt.push_str("- Keine Themen erfinden, die nicht in Eingaben stehen!\n");
    prompt.push_str("- Nummerierung § 1, § 2, ...\n");
    prompt.push_str("- Sprache: Deutsch (BGB)\n");
    prompt
}

fn name_or_missing(name: &str) -> &str {
    if name.is_empty() {
        MISSING_FIELD
    } else {
        name
    }
}

/// System instruction for Phase 2
#[must_use]
pub fn phase2_system() -> String {
    let sections = SECTION_TEMPLATE
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. {title}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Du bist Fachanwalt für deutsches Vertragsrecht. Erstelle den Vertrag exakt nach den Vorgaben.\n\n\
         Gliederung (vierzehn Abschnitte, in dieser Reihenfolge):\n{sections}\n\n\
         Verbindliche Regeln:\n\
         - Verwende ausschließlich die im Datenblock übergebenen Namen und Adressen, wortwörtlich\n\
         - Erfinde KEINE Platzhalter; nur als {MISSING_FIELD} markierte Felder bleiben als Platzhalter stehen\n\
         - KEINE Unterschriftszeilen oder Signaturblöcke (die Signatur erfolgt in einem separaten Workflow)\n\
         - Jeder Abschnitt enthält ausformulierten Fließtext, mindestens zwei vollständige Sätze\n\
         - Nummerierte Paragraphen (§ 1, § 2, ...) ohne Lücken"
    )
}

/// User message for Phase 2: the Phase-1 instructions plus a verbatim
/// high-priority data block that pins literal names and addresses
#[must_use]
pub fn phase2_user(generated_prompt: &str, input: &GenerationInput) -> String {
    let mut data_block = String::new();
    data_block.push_str(&format!(
        "Partei A: {}, {}\n",
        input.partei_a.name, input.partei_a.address
    ));
    if let Some(details) = &input.partei_a.details {
        data_block.push_str(&format!("  Zusatz: {details}\n"));
    }
    data_block.push_str(&format!(
        "Partei B: {}, {}\n",
        input.partei_b.name, input.partei_b.address
    ));
    if let Some(details) = &input.partei_b.details {
        data_block.push_str(&format!("  Zusatz: {details}\n"));
    }
    for (key, value) in &input.fields {
        data_block.push_str(&format!("{key}: {value}\n"));
    }
    if !input.custom_requirements.is_empty() {
        data_block.push_str(&format!(
            "Individuelle Vereinbarungen: {}\n",
            input.custom_requirements
        ));
    }

    format!(
        "{generated_prompt}\n\n\
         DATENBLOCK (höchste Priorität, wortwörtlich zu übernehmen):\n{data_block}"
    )
}

/// System instruction for the universal repair pass
#[must_use]
pub fn repair_system() -> String {
    "Du bist Fachanwalt für deutsches Vertragsrecht und korrigierst einen bestehenden Vertragstext.\n\n\
     Verbindliche Regeln:\n\
     - Füge jede fehlende Pflichtklausel ein und wähle dabei genau EINE der angegebenen Titel-Alternativen\n\
     - Nummeriere alle Paragraphen lückenlos und ohne Duplikate neu (§ 1, § 2, ...)\n\
     - Füge KEINE verbotenen Themen hinzu, die nicht bereits zulässig sind\n\
     - Erfinde KEINE Fakten; unbekannte Angaben bleiben als [Platzhalter] in eckigen Klammern stehen\n\
     - Kürze nichts: Umfang und Ausführlichkeit des Textes bleiben erhalten (Korrektur, keine Zusammenfassung)\n\n\
     Gib ausschließlich den vollständigen korrigierten Vertragstext zurück."
        .to_string()
}

/// User message for the universal repair pass
#[must_use]
pub fn repair_user(contract_text: &str, snapshot: &Snapshot) -> String {
    format!(
        "PFLICHTKLAUSELN:\n{}\n\n\
         VERBOTENE THEMEN:\n{}\n\n\
         VERTRAGSTEXT:\n{contract_text}",
        snapshot.must_clauses.join("\n"),
        if snapshot.forbidden_topics.is_empty() {
            "(keine)".to_string()
        } else {
            snapshot.forbidden_topics.join("\n")
        },
    )
}

/// User message for the loan specialization (zero-interest enforcement)
#[must_use]
pub fn loan_repair_user(contract_text: &str) -> String {
    format!(
        "Der folgende Darlehensvertrag wurde mit der Vereinbarung \"zinsfrei\" beauftragt.\n\n\
         Stelle sicher:\n\
         - Ein eigener Paragraph \"Zinsregelung\" erklärt die Zinsfreiheit ausdrücklich (0 % Zinsen)\n\
         - Konkrete Paragraphen zu Rückzahlung, Sicherheiten und Kündigung sind vorhanden\n\
         - Nummerierung bleibt lückenlos, kein Inhalt geht verloren\n\n\
         VERTRAGSTEXT:\n{contract_text}"
    )
}

/// User message for the custom-type specialization
#[must_use]
pub fn individuell_repair_user(contract_text: &str, snapshot: &Snapshot) -> String {
    format!(
        "Der folgende individuelle Vertrag verwendet benutzerdefinierte Rollen und Klauseln.\n\n\
         Stelle sicher:\n\
         - Die Rollenbezeichnungen \"{role_a}\" und \"{role_b}\" werden exakt und durchgängig verwendet\n\
         - Jede Pflichtklausel ist mit genau einer ihrer Titel-Alternativen vorhanden:\n{clauses}\n\
         - Nutzungsrechte, Vertraulichkeit und Datenschutz sind klar getrennte Paragraphen\n\
         - Kündigung und Laufzeit sind klar getrennte Paragraphen\n\n\
         VERTRAGSTEXT:\n{contract_text}",
        role_a = snapshot.roles.a,
        role_b = snapshot.roles.b,
        clauses = snapshot.must_clauses.join("\n"),
    )
}

/// System instruction for the self-check critic
#[must_use]
pub fn self_check_system() -> String {
    "Du bist Qualitätsprüfer für Vertragstext.\n\
     Vergleiche den Vertragstext mit den Vorgaben aus Phase 1.\n\n\
     Prüfkriterien:\n\
     1. Sind alle Must-Clauses vorhanden?\n\
     2. Wurden Forbidden Topics vermieden? (Themen aus den individuellen Vereinbarungen sind immer zulässig)\n\
     3. Stimmen Rollenbezeichnungen exakt?\n\
     4. Wurden keine nicht übergebenen Themen erfunden?\n\n\
     Gib JSON zurück:\n\
     {\n\
       \"conforms\": true/false,\n\
       \"score\": 0.0 - 1.0,\n\
       \"notes\": [\"Hinweis 1\", \"Hinweis 2\", ...]\n\
     }"
        .to_string()
}

/// Maximum contract-text length handed to the critic
const SELF_CHECK_TEXT_CAP: usize = 6000;

/// User message for the self-check critic
#[must_use]
pub fn self_check_user(contract_text: &str, generated_prompt: &str, snapshot: &Snapshot) -> String {
    let snapshot_json = serde_json::to_string_pretty(snapshot).unwrap_or_default();
    let capped: String = contract_text.chars().take(SELF_CHECK_TEXT_CAP).collect();
    format!(
        "VORGABEN (Phase 1):\n{generated_prompt}\n\n\
         SNAPSHOT:\n{snapshot_json}\n\n\
         VERTRAGSTEXT:\n{capped}\n\n\
         Bewerte die Übereinstimmung!"
    )
}
