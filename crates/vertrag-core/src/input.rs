//! User-supplied generation input
//!
//! One [`GenerationInput`] per request. Party names are mandatory and must
//! be injected verbatim into the generated text; everything else is
//! free-form key/value data specific to the contract type.

use crate::profile::Roles;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Identity of one contracting party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Legal name; mandatory, never fabricated by the pipeline
    pub name: String,
    /// Postal address
    pub address: String,
    /// Optional extra details (registry number, representative, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Party {
    /// Create a party from name and address
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            details: None,
        }
    }

    /// With extra details
    #[inline]
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Per-request profile overrides, honored only for the custom contract type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOverrides {
    /// Override role labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Roles>,
    /// Override must-clause specs (`"§ <n> <Title>[|<Alt>...]"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_clauses: Option<Vec<String>>,
    /// Override forbidden topics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbidden_topics: Option<Vec<String>>,
    /// Override forbidden-topic synonyms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbidden_synonyms: Option<HashMap<String, Vec<String>>>,
}

/// Structured form input for one generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    /// Party A (role A of the profile)
    pub partei_a: Party,
    /// Party B (role B of the profile)
    pub partei_b: Party,
    /// Contract-type-specific scalar fields (rent amount, start date, ...)
    ///
    /// BTreeMap so prompt construction is deterministic.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Free-text requirements integrated as binding clauses
    #[serde(default)]
    pub custom_requirements: String,
    /// Profile overrides (custom contract type only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ProfileOverrides>,
    /// Batch-harness attribution label, echoed into the provenance record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_label: Option<String>,
}

impl GenerationInput {
    /// Create input from the two parties
    #[inline]
    #[must_use]
    pub fn new(partei_a: Party, partei_b: Party) -> Self {
        Self {
            partei_a,
            partei_b,
            fields: BTreeMap::new(),
            custom_requirements: String::new(),
            overrides: None,
            run_label: None,
        }
    }

    /// With a scalar field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// With custom requirements text
    #[inline]
    #[must_use]
    pub fn with_custom_requirements(mut self, text: impl Into<String>) -> Self {
        self.custom_requirements = text.into();
        self
    }

    /// With profile overrides
    #[inline]
    #[must_use]
    pub fn with_overrides(mut self, overrides: ProfileOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// With a run label
    #[inline]
    #[must_use]
    pub fn with_run_label(mut self, label: impl Into<String>) -> Self {
        self.run_label = Some(label.into());
        self
    }

    /// Lower-cased haystack of every raw input value
    ///
    /// Used by the forbidden-topic filter: a topic mentioned anywhere in
    /// here was explicitly requested by the user and must not be flagged.
    #[must_use]
    pub fn flattened_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            &self.partei_a.name,
            &self.partei_a.address,
            &self.partei_b.name,
            &self.partei_b.address,
        ];
        if let Some(details) = &self.partei_a.details {
            parts.push(details);
        }
        if let Some(details) = &self.partei_b.details {
            parts.push(details);
        }
        for (key, value) in &self.fields {
            parts.push(key);
            parts.push(value);
        }
        parts.push(&self.custom_requirements);
        parts.join("\n").to_lowercase()
    }
}
