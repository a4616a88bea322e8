//! Keyword-based symptom extraction.

use std::collections::BTreeSet;

use aarogya_catalog::SymptomDictionary;

/// Collect every symptom category whose trigger words occur in `text`.
///
/// Matching is a plain substring search over the lower-cased input, so trigger words in any
/// supported script are found regardless of the caller's interface language. Categories are
/// independent: one word can trigger several (for example "headache" also contains "ache").
pub fn extract_symptoms(dictionary: &SymptomDictionary, text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    if lowered.trim().is_empty() {
        return BTreeSet::new();
    }

    let found: BTreeSet<String> = dictionary
        .categories()
        .iter()
        .filter(|category| {
            category
                .triggers
                .iter()
                .filter(|t| !t.is_empty())
                .any(|t| lowered.contains(t.as_str()))
        })
        .map(|category| category.key.clone())
        .collect();

    tracing::debug!(symptoms = ?found, "extracted symptoms");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use aarogya_catalog::{Catalog, SymptomCategory};

    fn dictionary() -> SymptomDictionary {
        Catalog::bundled().unwrap().symptoms().clone()
    }

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_fever_and_headache() {
        let found = extract_symptoms(&dictionary(), "I have fever and headache");
        assert!(found.is_superset(&set(&["fever", "headache"])));
        // "headache" contains the pain trigger "ache".
        assert!(found.contains("pain"));
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(extract_symptoms(&dictionary(), "").is_empty());
        assert!(extract_symptoms(&dictionary(), "   ").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_symptoms(&dictionary(), "COUGHING all night"), set(&["cough"]));
    }

    #[test]
    fn test_hindi_and_odia_triggers() {
        assert_eq!(extract_symptoms(&dictionary(), "मुझे बुखार है"), set(&["fever"]));
        assert_eq!(extract_symptoms(&dictionary(), "ମୋର କାଶ ହେଉଛି"), set(&["cough"]));
    }

    #[test]
    fn test_no_symptoms() {
        assert!(extract_symptoms(&dictionary(), "when is the vaccination camp").is_empty());
    }

    #[test]
    fn test_custom_dictionary() {
        let dict = SymptomDictionary::new(vec![SymptomCategory {
            key: "rash".into(),
            triggers: vec!["Spots".into()],
        }]);
        assert_eq!(extract_symptoms(&dict, "red spots on arm"), set(&["rash"]));
    }
}
