//! Keyword dictionaries used by symptom extraction and intent classification.

use serde::{Deserialize, Serialize};

use crate::{CatalogError, CatalogResult};

/// One symptom category and the words that signal it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymptomCategory {
    pub key: String,
    pub triggers: Vec<String>,
}

/// Ordered symptom categories. Trigger words are stored lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymptomDictionary {
    categories: Vec<SymptomCategory>,
}

impl SymptomDictionary {
    pub fn new(categories: Vec<SymptomCategory>) -> Self {
        let categories = categories
            .into_iter()
            .map(|c| SymptomCategory {
                key: c.key,
                triggers: c.triggers.iter().map(|t| t.to_lowercase()).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[SymptomCategory] {
        &self.categories
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        for category in &self.categories {
            if category.key.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "symptom category key cannot be empty".into(),
                ));
            }
            if category.triggers.iter().all(|t| t.trim().is_empty()) {
                return Err(CatalogError::Validation(format!(
                    "symptom category '{}' has no trigger words",
                    category.key
                )));
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for SymptomDictionary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<SymptomCategory>::deserialize(deserializer).map(Self::new)
    }
}

/// Keyword sets for the four keyword-driven intents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntentKeywords {
    #[serde(default)]
    pub vaccination: Vec<String>,
    #[serde(default)]
    pub disease: Vec<String>,
    #[serde(default)]
    pub symptom: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
}

impl IntentKeywords {
    /// True when any keyword in `set` occurs in the already lower-cased `text`.
    pub fn any_in(set: &[String], text: &str) -> bool {
        set.iter()
            .filter(|k| !k.is_empty())
            .any(|k| text.contains(&k.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_lowercases_triggers() {
        let dict = SymptomDictionary::new(vec![SymptomCategory {
            key: "fever".into(),
            triggers: vec!["FEVER".into(), "Hot".into()],
        }]);
        assert_eq!(dict.categories()[0].triggers, vec!["fever", "hot"]);
    }

    #[test]
    fn test_dictionary_rejects_category_without_triggers() {
        let dict = SymptomDictionary::new(vec![SymptomCategory {
            key: "cough".into(),
            triggers: vec!["  ".into()],
        }]);
        assert!(matches!(dict.validate(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_any_in() {
        let set = vec!["vaccine".to_string(), "टीका".to_string()];
        assert!(IntentKeywords::any_in(&set, "when is the next vaccine drive"));
        assert!(IntentKeywords::any_in(&set, "टीका कब लगेगा"));
        assert!(!IntentKeywords::any_in(&set, "i have a cough"));
    }
}
