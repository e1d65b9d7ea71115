//! Placeholder back-substitution
//!
//! Phase 2 is instructed to carry party data verbatim, but models still
//! emit bracket placeholders like `[Name des Vermieters]`. Substitution
//! is table-driven: every rule maps one pattern family to a party slot
//! and field, so supporting a new contract type means extending the
//! role lists below, not adding code.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use vertrag_core::GenerationInput;

/// Canonical party slot a placeholder resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartySlot {
    /// Party A of the profile (Vermieter, Auftraggeber, ...)
    A,
    /// Party B of the profile (Mieter, Auftragnehmer, ...)
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartyField {
    Name,
    Address,
}

struct PlaceholderRule {
    slot: PartySlot,
    field: PartyField,
    pattern: Regex,
}

// Genitive role forms as they appear inside placeholders.
const GENITIVES_A: &str = "Vermieters|Auftraggebers|Verkäufers|Darlehensgebers";
const GENITIVES_B: &str = "Mieters|Auftragnehmers|Käufers|Darlehensnehmers";
const ROLES_A: &str = "Vermieter|Auftraggeber|Verkäufer|Darlehensgeber";
const ROLES_B: &str = "Mieter|Auftragnehmer|Käufer|Darlehensnehmer";

static RULES: Lazy<Vec<PlaceholderRule>> = Lazy::new(|| {
    let mut rules = Vec::new();
    let mut rule = |slot, field, pattern: String| {
        rules.push(PlaceholderRule {
            slot,
            field,
            pattern: Regex::new(&pattern).unwrap(),
        });
    };

    for (slot, genitives, roles, letter) in [
        (PartySlot::A, GENITIVES_A, ROLES_A, "A"),
        (PartySlot::B, GENITIVES_B, ROLES_B, "B"),
    ] {
        rule(
            slot,
            PartyField::Name,
            format!(r"(?i)\[(?:vollständiger\s+)?Name\s+des\s+(?:{genitives})\]"),
        );
        rule(
            slot,
            PartyField::Name,
            format!(r"(?i)\[(?:Name\s+(?:der\s+)?)?Partei\s+{letter}\]"),
        );
        rule(slot, PartyField::Name, format!(r"(?i)\[(?:{roles})\]"));
        rule(
            slot,
            PartyField::Address,
            format!(r"(?i)\[(?:Adresse|Anschrift)\s+des\s+(?:{genitives})\]"),
        );
        rule(
            slot,
            PartyField::Address,
            format!(r"(?i)\[(?:Adresse|Anschrift)\s+(?:der\s+)?Partei\s+{letter}\]"),
        );
    }

    rules
});

/// Replace every known bracket placeholder with literal party data
///
/// Unknown brackets are left untouched; an empty party field is never
/// substituted so missing data stays visibly marked in the text.
#[must_use]
pub fn substitute_placeholders(text: &str, input: &GenerationInput) -> String {
    let mut out = text.to_string();
    for rule in RULES.iter() {
        let party = match rule.slot {
            PartySlot::A => &input.partei_a,
            PartySlot::B => &input.partei_b,
        };
        let value = match rule.field {
            PartyField::Name => party.name.as_str(),
            PartyField::Address => party.address.as_str(),
        };
        if value.is_empty() {
            continue;
        }
        if rule.pattern.is_match(&out) {
            out = rule.pattern.replace_all(&out, NoExpand(value)).into_owned();
        }
    }
    out
}
