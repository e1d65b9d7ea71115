//! Fuzzy text normalization
//!
//! Must-clause titles are matched leniently: both the title and the
//! contract text are lower-cased, punctuation-stripped, and
//! whitespace-collapsed before a plain substring test. `"Vergütung:"`
//! in a heading therefore matches the title `"Vergütung"`.

/// Normalize text for fuzzy matching
///
/// Lower-cases, replaces every non-alphanumeric run with a single
/// space, and trims. Umlauts and ß survive as word characters.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_gap = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_gap && !out.is_empty() {
                out.push(' ');
            }
            pending_gap = false;
            out.extend(c.to_lowercase());
        } else {
            pending_gap = true;
        }
    }
    out
}

/// Substring test against an already-normalized haystack
///
/// The needle is normalized here; callers normalize the haystack once
/// and reuse it across many needles.
#[must_use]
pub fn normalized_contains(normalized_haystack: &str, needle: &str) -> bool {
    let needle = normalize(needle);
    !needle.is_empty() && normalized_haystack.contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_lowercases_and_collapses() {
        assert_eq!(normalize("§ 3   Vergütung / Honorar!"), "3 vergütung honorar");
    }

    #[test]
    fn normalize_keeps_umlauts() {
        assert_eq!(normalize("Schönheitsreparaturen"), "schönheitsreparaturen");
    }

    #[test]
    fn normalize_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("--- §§ ---"), "");
    }

    #[test]
    fn contains_matches_across_punctuation() {
        let haystack = normalize("§ 2 Vergütung:\nDas Honorar beträgt...");
        assert!(normalized_contains(&haystack, "Vergütung"));
        assert!(normalized_contains(&haystack, "HONORAR"));
        assert!(!normalized_contains(&haystack, "Kündigung"));
    }

    #[test]
    fn empty_needle_never_matches() {
        assert!(!normalized_contains("irgendein text", ""));
        assert!(!normalized_contains("irgendein text", "!!!"));
    }
}
