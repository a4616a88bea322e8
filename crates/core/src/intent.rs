//! Intent classification.

use std::fmt;

use aarogya_catalog::{IntentKeywords, SymptomDictionary, TemplateKey};
use serde::{Deserialize, Serialize};

use crate::extract::extract_symptoms;

/// What a user message is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    VaccinationInfo,
    DiseaseInfo,
    SymptomCheck,
    PreventionInfo,
    GeneralHealth,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        self.template_key().as_str()
    }

    /// Reply template used for this intent.
    pub fn template_key(self) -> TemplateKey {
        match self {
            Self::VaccinationInfo => TemplateKey::VaccinationInfo,
            Self::DiseaseInfo => TemplateKey::DiseaseInfo,
            Self::SymptomCheck => TemplateKey::SymptomCheck,
            Self::PreventionInfo => TemplateKey::PreventionInfo,
            Self::GeneralHealth => TemplateKey::GeneralHealth,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `text` with a fixed-priority cascade; the first matching rule wins.
///
/// 1. vaccination keywords
/// 2. disease keywords
/// 3. symptom keywords, or any extracted symptom
/// 4. prevention keywords
/// 5. otherwise general health
pub fn classify_intent(
    keywords: &IntentKeywords,
    dictionary: &SymptomDictionary,
    text: &str,
) -> Intent {
    let lowered = text.to_lowercase();

    let intent = if IntentKeywords::any_in(&keywords.vaccination, &lowered) {
        Intent::VaccinationInfo
    } else if IntentKeywords::any_in(&keywords.disease, &lowered) {
        Intent::DiseaseInfo
    } else if IntentKeywords::any_in(&keywords.symptom, &lowered)
        || !extract_symptoms(dictionary, text).is_empty()
    {
        Intent::SymptomCheck
    } else if IntentKeywords::any_in(&keywords.prevention, &lowered) {
        Intent::PreventionInfo
    } else {
        Intent::GeneralHealth
    };

    tracing::debug!(%intent, "classified message");
    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use aarogya_catalog::Catalog;

    fn classify(text: &str) -> Intent {
        let catalog = Catalog::bundled().unwrap();
        classify_intent(catalog.intents(), catalog.symptoms(), text)
    }

    #[test]
    fn test_vaccination_keywords() {
        assert_eq!(classify("Where can I get the covid vaccine?"), Intent::VaccinationInfo);
        assert_eq!(classify("ଟିକା"), Intent::VaccinationInfo);
        assert_eq!(classify("टीकाकरण कब है"), Intent::VaccinationInfo);
    }

    #[test]
    fn test_priority_order() {
        // vaccination beats disease and symptoms
        assert_eq!(
            classify("vaccine for a disease with fever"),
            Intent::VaccinationInfo
        );
        // disease beats symptoms
        assert_eq!(classify("what disease causes fever"), Intent::DiseaseInfo);
        // symptoms beat prevention
        assert_eq!(classify("how to prevent cough"), Intent::SymptomCheck);
    }

    #[test]
    fn test_symptom_check_from_extraction() {
        assert_eq!(classify("I have fever and headache"), Intent::SymptomCheck);
        assert_eq!(classify("what are the symptoms"), Intent::SymptomCheck);
    }

    #[test]
    fn test_prevention_and_general() {
        assert_eq!(classify("how do I prevent malaria"), Intent::PreventionInfo);
        assert_eq!(classify(""), Intent::GeneralHealth);
        assert_eq!(classify("hello there"), Intent::GeneralHealth);
    }

    #[test]
    fn test_intent_serializes_as_template_key() {
        assert_eq!(
            serde_json::to_string(&Intent::SymptomCheck).unwrap(),
            "\"symptom_check\""
        );
        assert_eq!(Intent::PreventionInfo.to_string(), "prevention_info");
    }
}
