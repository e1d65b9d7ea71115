//! Contract-type profiles
//!
//! Static per-type configuration: exact role labels, the ordered
//! must-clause list, and forbidden topics with their synonym sets.
//! Profiles are read-only after load and safe for unsynchronized
//! concurrent reads.

use crate::error::ProfileError;
use crate::input::ProfileOverrides;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Supported contract types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Residential lease (Vermieter/Mieter)
    Mietvertrag,
    /// Freelance service contract (Auftraggeber/Auftragnehmer)
    Freelancer,
    /// Sale contract (Verkäufer/Käufer)
    Kaufvertrag,
    /// Loan contract (Darlehensgeber/Darlehensnehmer)
    Darlehen,
    /// Free-form custom contract (Partei A/Partei B, overridable)
    Individuell,
}

impl ContractType {
    /// Wire identifier used by callers and stored in provenance records
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mietvertrag => "mietvertrag",
            Self::Freelancer => "freelancer",
            Self::Kaufvertrag => "kaufvertrag",
            Self::Darlehen => "darlehen",
            Self::Individuell => "individuell",
        }
    }

    /// Whether this is the free-form type whose profile may be overridden
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Individuell)
    }
}

impl FromStr for ContractType {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mietvertrag" => Ok(Self::Mietvertrag),
            "freelancer" => Ok(Self::Freelancer),
            "kaufvertrag" => Ok(Self::Kaufvertrag),
            "darlehen" => Ok(Self::Darlehen),
            "individuell" => Ok(Self::Individuell),
            other => Err(ProfileError::UnknownContractType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact role labels for the two parties
///
/// These terms must appear verbatim in the generated text; no synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    /// Label for party A (e.g. "Vermieter")
    #[serde(rename = "A")]
    pub a: String,
    /// Label for party B (e.g. "Mieter")
    #[serde(rename = "B")]
    pub b: String,
}

impl Roles {
    /// Create a role pair
    #[inline]
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }
}

/// A mandatory contract paragraph: number plus acceptable title alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MustClause {
    /// Paragraph number (contiguous from 1 in the final text)
    pub number: u32,
    /// Acceptable titles; any single one satisfies the clause
    pub titles: Vec<String>,
}

impl MustClause {
    /// Create a clause from number and title alternatives
    #[inline]
    #[must_use]
    pub fn new(number: u32, titles: &[&str]) -> Self {
        Self {
            number,
            titles: titles.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    /// Clause that can only be satisfied by a title match
    ///
    /// Used when a snapshot string carries no parseable `§ <n>` prefix.
    #[inline]
    #[must_use]
    pub fn title_only(title: impl Into<String>) -> Self {
        Self {
            number: 0,
            titles: vec![title.into()],
        }
    }

    /// Parse a spec string of the form `"§ <n> <Title>[|<Alt>...]"`
    pub fn parse(spec: &str) -> Result<Self, ProfileError> {
        let rest = spec
            .trim()
            .strip_prefix('§')
            .ok_or_else(|| ProfileError::InvalidMustClause(spec.to_string()))?
            .trim_start();

        let digit_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let number: u32 = rest[..digit_end]
            .parse()
            .map_err(|_| ProfileError::InvalidMustClause(spec.to_string()))?;

        let titles: Vec<String> = rest[digit_end..]
            .trim()
            .split('|')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self { number, titles })
    }

    /// Render back to the canonical spec string
    #[must_use]
    pub fn spec_string(&self) -> String {
        if self.titles.is_empty() {
            format!("§ {}", self.number)
        } else {
            format!("§ {} {}", self.number, self.titles.join("|"))
        }
    }
}

/// Static per-type configuration consumed by prompt construction and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTypeProfile {
    /// Contract type this profile belongs to
    pub contract_type: ContractType,
    /// Exact role labels
    pub roles: Roles,
    /// Ordered mandatory clauses
    pub must_clauses: Vec<MustClause>,
    /// Topics that must not appear unless present in user input
    pub forbidden_topics: Vec<String>,
    /// Synonyms per forbidden topic, used when scanning input for mentions
    pub forbidden_synonyms: HashMap<String, Vec<String>>,
}

impl ContractTypeProfile {
    /// Registered synonyms for a forbidden topic (empty slice if none)
    #[must_use]
    pub fn synonyms_for(&self, topic: &str) -> &[String] {
        self.forbidden_synonyms
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Must-clause spec strings, as exposed to Phase 1 and the snapshot
    #[must_use]
    pub fn must_clause_specs(&self) -> Vec<String> {
        self.must_clauses.iter().map(MustClause::spec_string).collect()
    }

    /// Resolve this profile against per-request overrides
    ///
    /// Overrides are honored only for [`ContractType::Individuell`]; for
    /// every other type the static profile wins and overrides are ignored.
    #[must_use]
    pub fn resolved(&self, overrides: Option<&ProfileOverrides>) -> ContractTypeProfile {
        let Some(ov) = overrides.filter(|_| self.contract_type.is_custom()) else {
            return self.clone();
        };

        let mut profile = self.clone();
        if let Some(roles) = &ov.roles {
            profile.roles = roles.clone();
        }
        if let Some(specs) = &ov.must_clauses {
            profile.must_clauses = specs
                .iter()
                .map(|s| MustClause::parse(s).unwrap_or_else(|_| MustClause::title_only(s)))
                .collect();
        }
        if let Some(topics) = &ov.forbidden_topics {
            profile.forbidden_topics = topics.clone();
        }
        if let Some(synonyms) = &ov.forbidden_synonyms {
            profile.forbidden_synonyms = synonyms.clone();
        }
        profile
    }
}

/// Canonical BGB role terms scanned for by the role check
///
/// Any of these present in a contract whose profile does not designate it
/// is a validation error.
#[must_use]
pub fn canonical_role_terms() -> &'static [&'static str] {
    &[
        "Vermieter",
        "Mieter",
        "Auftraggeber",
        "Auftragnehmer",
        "Verkäufer",
        "Käufer",
        "Darlehensgeber",
        "Darlehensnehmer",
    ]
}

fn synonyms(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(topic, syns)| {
            (
                (*topic).to_string(),
                syns.iter().map(|s| (*s).to_string()).collect(),
            )
        })
        .collect()
}

static PROFILES: Lazy<HashMap<ContractType, ContractTypeProfile>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        ContractType::Mietvertrag,
        ContractTypeProfile {
            contract_type: ContractType::Mietvertrag,
            roles: Roles::new("Vermieter", "Mieter"),
            must_clauses: vec![
                MustClause::new(1, &["Mietobjekt", "Mietsache"]),
                MustClause::new(2, &["Mietzeit", "Mietdauer"]),
                MustClause::new(3, &["Miete", "Mietzins"]),
                MustClause::new(4, &["Nebenkosten", "Betriebskosten"]),
                MustClause::new(5, &["Kaution", "Mietsicherheit"]),
                MustClause::new(6, &["Schönheitsreparaturen", "Instandhaltung"]),
                MustClause::new(7, &["Kündigung"]),
                MustClause::new(8, &["Schlussbestimmungen"]),
            ],
            forbidden_topics: vec![
                "Haustiere".to_string(),
                "Untermiete".to_string(),
                "Gewerbe".to_string(),
            ],
            forbidden_synonyms: synonyms(&[
                ("Haustiere", &["Tierhaltung", "Hund", "Katze"]),
                ("Untermiete", &["Untervermietung"]),
                ("Gewerbe", &["gewerblich"]),
            ]),
        },
    );

    map.insert(
        ContractType::Freelancer,
        ContractTypeProfile {
            contract_type: ContractType::Freelancer,
            roles: Roles::new("Auftraggeber", "Auftragnehmer"),
            must_clauses: vec![
                MustClause::new(1, &["Vertragsgegenstand", "Leistungsumfang"]),
                MustClause::new(2, &["Vergütung", "Honorar"]),
                MustClause::new(3, &["Leistungserbringung"]),
                MustClause::new(4, &["Vertraulichkeit", "Geheimhaltung"]),
                MustClause::new(5, &["Nutzungsrechte", "Rechteübertragung"]),
                MustClause::new(6, &["Haftung"]),
                MustClause::new(7, &["Laufzeit", "Vertragsdauer"]),
                MustClause::new(8, &["Schlussbestimmungen"]),
            ],
            forbidden_topics: vec![
                "Wettbewerbsverbot".to_string(),
                "Urlaubsanspruch".to_string(),
                "Arbeitszeiterfassung".to_string(),
            ],
            forbidden_synonyms: synonyms(&[
                ("Wettbewerbsverbot", &["Konkurrenzverbot"]),
                ("Urlaubsanspruch", &["Urlaub"]),
                ("Arbeitszeiterfassung", &["Zeiterfassung"]),
            ]),
        },
    );

    map.insert(
        ContractType::Kaufvertrag,
        ContractTypeProfile {
            contract_type: ContractType::Kaufvertrag,
            roles: Roles::new("Verkäufer", "Käufer"),
            must_clauses: vec![
                MustClause::new(1, &["Kaufgegenstand"]),
                MustClause::new(2, &["Kaufpreis"]),
                MustClause::new(3, &["Übergabe", "Lieferung"]),
                MustClause::new(4, &["Eigentumsvorbehalt"]),
                MustClause::new(5, &["Gewährleistung", "Sachmängelhaftung"]),
                MustClause::new(6, &["Haftung"]),
                MustClause::new(7, &["Schlussbestimmungen"]),
            ],
            forbidden_topics: vec!["Ratenzahlung".to_string(), "Finanzierung".to_string()],
            forbidden_synonyms: synonyms(&[
                ("Ratenzahlung", &["Raten"]),
                ("Finanzierung", &["finanziert"]),
            ]),
        },
    );

    map.insert(
        ContractType::Darlehen,
        ContractTypeProfile {
            contract_type: ContractType::Darlehen,
            roles: Roles::new("Darlehensgeber", "Darlehensnehmer"),
            must_clauses: vec![
                MustClause::new(1, &["Darlehenssumme", "Darlehensbetrag"]),
                MustClause::new(2, &["Auszahlung"]),
                MustClause::new(3, &["Zinsregelung", "Verzinsung"]),
                MustClause::new(4, &["Rückzahlung", "Tilgung"]),
                MustClause::new(5, &["Sicherheiten"]),
                MustClause::new(6, &["Kündigung"]),
                MustClause::new(7, &["Schlussbestimmungen"]),
            ],
            forbidden_topics: vec!["Bürgschaft".to_string(), "Grundschuld".to_string()],
            forbidden_synonyms: synonyms(&[
                ("Bürgschaft", &["Bürge"]),
                ("Grundschuld", &["Grundpfandrecht"]),
            ]),
        },
    );

    map.insert(
        ContractType::Individuell,
        ContractTypeProfile {
            contract_type: ContractType::Individuell,
            roles: Roles::new("Partei A", "Partei B"),
            must_clauses: vec![
                MustClause::new(1, &["Vertragsgegenstand"]),
                MustClause::new(2, &["Pflichten der Parteien"]),
                MustClause::new(3, &["Vergütung", "Honorar"]),
                MustClause::new(4, &["Laufzeit", "Vertragsdauer"]),
                MustClause::new(5, &["Kündigung"]),
                MustClause::new(6, &["Vertraulichkeit", "Geheimhaltung"]),
                MustClause::new(7, &["Schlussbestimmungen"]),
            ],
            forbidden_topics: Vec::new(),
            forbidden_synonyms: HashMap::new(),
        },
    );

    map
});

/// Look up the static profile for a contract type
///
/// Profiles are immutable after first access; concurrent reads are safe.
#[must_use]
pub fn profile_for(contract_type: ContractType) -> &'static ContractTypeProfile {
    // Every variant is inserted above; the registry is total.
    &PROFILES[&contract_type]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn contract_type_round_trip() {
        for ct in [
            ContractType::Mietvertrag,
            ContractType::Freelancer,
            ContractType::Kaufvertrag,
            ContractType::Darlehen,
            ContractType::Individuell,
        ] {
            assert_eq!(ct.as_str().parse::<ContractType>().unwrap(), ct);
        }
    }

    #[test]
    fn contract_type_unknown() {
        let err = "leasing".parse::<ContractType>().unwrap_err();
        assert!(err.to_string().contains("leasing"));
    }

    #[test]
    fn must_clause_parse_single_title() {
        let clause = MustClause::parse("§ 1 Mietobjekt").unwrap();
        assert_eq!(clause.number, 1);
        assert_eq!(clause.titles, vec!["Mietobjekt"]);
    }

    #[test]
    fn must_clause_parse_alternatives() {
        let clause = MustClause::parse("§ 3 Vergütung|Honorar").unwrap();
        assert_eq!(clause.number, 3);
        assert_eq!(clause.titles, vec!["Vergütung", "Honorar"]);
    }

    #[test]
    fn must_clause_parse_no_space_after_sign() {
        let clause = MustClause::parse("§12 Kündigung").unwrap();
        assert_eq!(clause.number, 12);
        assert_eq!(clause.titles, vec!["Kündigung"]);
    }

    #[test]
    fn must_clause_parse_rejects_missing_sign() {
        assert!(MustClause::parse("3 Vergütung").is_err());
        assert!(MustClause::parse("§ x Vergütung").is_err());
    }

    #[test]
    fn must_clause_spec_round_trip() {
        let spec = "§ 3 Vergütung|Honorar";
        let clause = MustClause::parse(spec).unwrap();
        assert_eq!(clause.spec_string(), spec);
    }

    #[test]
    fn profiles_registered_for_all_types() {
        for ct in [
            ContractType::Mietvertrag,
            ContractType::Freelancer,
            ContractType::Kaufvertrag,
            ContractType::Darlehen,
            ContractType::Individuell,
        ] {
            let profile = profile_for(ct);
            assert_eq!(profile.contract_type, ct);
            assert!(!profile.roles.a.is_empty());
            assert!(!profile.must_clauses.is_empty());
        }
    }

    #[test]
    fn profile_clause_numbers_contiguous() {
        for profile in PROFILES.values() {
            for (idx, clause) in profile.must_clauses.iter().enumerate() {
                assert_eq!(clause.number as usize, idx + 1, "{}", profile.contract_type);
            }
        }
    }

    #[test]
    fn resolved_ignores_overrides_for_static_types() {
        let overrides = ProfileOverrides {
            roles: Some(Roles::new("Partner A", "Partner B")),
            ..ProfileOverrides::default()
        };
        let profile = profile_for(ContractType::Mietvertrag).resolved(Some(&overrides));
        assert_eq!(profile.roles.a, "Vermieter");
    }

    #[test]
    fn resolved_applies_overrides_for_individuell() {
        let overrides = ProfileOverrides {
            roles: Some(Roles::new("Lizenzgeber", "Lizenznehmer")),
            must_clauses: Some(vec!["§ 1 Lizenzumfang".to_string()]),
            forbidden_topics: Some(vec!["Exklusivität".to_string()]),
            forbidden_synonyms: None,
        };
        let profile = profile_for(ContractType::Individuell).resolved(Some(&overrides));
        assert_eq!(profile.roles.a, "Lizenzgeber");
        assert_eq!(profile.must_clauses.len(), 1);
        assert_eq!(profile.must_clauses[0].number, 1);
        assert_eq!(profile.forbidden_topics, vec!["Exklusivität"]);
    }

    #[test]
    fn resolved_falls_back_to_title_only_for_bad_spec() {
        let overrides = ProfileOverrides {
            must_clauses: Some(vec!["Datenschutzregelung".to_string()]),
            ..ProfileOverrides::default()
        };
        let profile = profile_for(ContractType::Individuell).resolved(Some(&overrides));
        assert_eq!(profile.must_clauses[0].number, 0);
        assert_eq!(profile.must_clauses[0].titles, vec!["Datenschutzregelung"]);
    }

    #[test]
    fn canonical_terms_cover_all_profiles() {
        let terms = canonical_role_terms();
        for profile in PROFILES.values() {
            if profile.contract_type.is_custom() {
                continue;
            }
            assert!(terms.contains(&profile.roles.a.as_str()));
            assert!(terms.contains(&profile.roles.b.as_str()));
        }
    }
}
