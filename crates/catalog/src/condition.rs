use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Language;

/// Clinical severity of a catalogued condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

/// A health condition as described in `conditions.yaml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    pub id: String,
    pub name: String,
    pub category: String,
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub causes: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
    #[serde(default)]
    pub treatment: Vec<String>,
    pub severity: Severity,
    pub contagious: bool,
    #[serde(default)]
    pub translations: HashMap<Language, ConditionTranslation>,
}

/// Per-language overrides. Any field left out falls back to the English entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionTranslation {
    pub name: Option<String>,
    pub symptoms: Option<Vec<String>>,
    pub causes: Option<Vec<String>>,
    pub prevention: Option<Vec<String>>,
    pub treatment: Option<Vec<String>>,
}

/// A condition rendered for one language.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocalizedCondition {
    pub id: String,
    pub name: String,
    pub category: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub prevention: Vec<String>,
    pub treatment: Vec<String>,
    pub severity: Severity,
    pub contagious: bool,
}

impl Condition {
    /// Display name for `language`, falling back to the catalog name.
    pub fn display_name(&self, language: Language) -> &str {
        self.translations
            .get(&language)
            .and_then(|t| t.name.as_deref())
            .unwrap_or(&self.name)
    }

    pub fn localized(&self, language: Language) -> LocalizedCondition {
        let translation = self.translations.get(&language);
        let pick = |field: Option<&Vec<String>>, fallback: &Vec<String>| {
            field.unwrap_or(fallback).clone()
        };

        LocalizedCondition {
            id: self.id.clone(),
            name: self.display_name(language).to_string(),
            category: self.category.clone(),
            symptoms: pick(translation.and_then(|t| t.symptoms.as_ref()), &self.symptoms),
            causes: pick(translation.and_then(|t| t.causes.as_ref()), &self.causes),
            prevention: pick(translation.and_then(|t| t.prevention.as_ref()), &self.prevention),
            treatment: pick(translation.and_then(|t| t.treatment.as_ref()), &self.treatment),
            severity: self.severity,
            contagious: self.contagious,
        }
    }
}

/// Filter for browsing the condition catalog.
///
/// `text` matches the English name or any English symptom, case-insensitively.
/// `category` must match exactly (ignoring case) when given.
#[derive(Clone, Debug, Default)]
pub struct ConditionQuery {
    pub text: Option<String>,
    pub category: Option<String>,
}

impl ConditionQuery {
    pub fn matches(&self, condition: &Condition) -> bool {
        let text_ok = match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                condition.name.to_lowercase().contains(&needle)
                    || condition
                        .symptoms
                        .iter()
                        .any(|s| s.to_lowercase().contains(&needle))
            }
        };

        let category_ok = match self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            None => true,
            Some(category) => condition.category.eq_ignore_ascii_case(category),
        };

        text_ok && category_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    #[test]
    fn test_localized_condition_uses_translation() {
        let catalog = Catalog::bundled().unwrap();
        let malaria = catalog.condition("malaria").unwrap();

        let hindi = malaria.localized(Language::Hindi);
        assert_eq!(hindi.name, "मलेरिया");
        assert_eq!(hindi.symptoms[0], "बुखार");
        assert_eq!(hindi.severity, Severity::High);

        let english = malaria.localized(Language::English);
        assert_eq!(english.name, "Malaria");
        assert_eq!(english.symptoms, malaria.symptoms);
    }

    #[test]
    fn test_missing_translation_falls_back_to_english() {
        let condition = Condition {
            id: "cholera".into(),
            name: "Cholera".into(),
            category: "Waterborne Disease".into(),
            symptoms: vec!["Diarrhoea".into()],
            causes: vec![],
            prevention: vec![],
            treatment: vec![],
            severity: Severity::Critical,
            contagious: true,
            translations: HashMap::from([(
                Language::Odia,
                ConditionTranslation {
                    name: Some("କଲେରା".into()),
                    ..Default::default()
                },
            )]),
        };

        assert_eq!(condition.display_name(Language::Hindi), "Cholera");
        let odia = condition.localized(Language::Odia);
        assert_eq!(odia.name, "କଲେରା");
        assert_eq!(odia.symptoms, vec!["Diarrhoea".to_string()]);
    }

    #[test]
    fn test_query_matches_name_or_symptom() {
        let catalog = Catalog::bundled().unwrap();

        let by_name = catalog.search_conditions(&ConditionQuery {
            text: Some("DENGUE".into()),
            category: None,
        });
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "dengue");

        let by_symptom = catalog.search_conditions(&ConditionQuery {
            text: Some("headache".into()),
            category: None,
        });
        let ids: Vec<&str> = by_symptom.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["malaria", "dengue"]);
    }

    #[test]
    fn test_query_category_filter() {
        let catalog = Catalog::bundled().unwrap();

        let metabolic = catalog.search_conditions(&ConditionQuery {
            text: None,
            category: Some("metabolic disorder".into()),
        });
        assert_eq!(metabolic.len(), 1);
        assert_eq!(metabolic[0].id, "diabetes");

        let none = catalog.search_conditions(&ConditionQuery {
            text: Some("fever".into()),
            category: Some("Metabolic Disorder".into()),
        });
        assert!(none.is_empty());

        assert_eq!(catalog.search_conditions(&ConditionQuery::default()).len(), 3);
    }
}
