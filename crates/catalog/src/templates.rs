//! Localized reply text.
//!
//! Every lookup tries the requested language first, then English. English is required to
//! carry the `general_health` template, the assessment labels and every recommendation, so
//! a validated catalog can always answer.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CatalogError, CatalogResult, Language};

/// Named reply templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKey {
    Greeting,
    VaccinationInfo,
    DiseaseInfo,
    SymptomCheck,
    PreventionInfo,
    GeneralHealth,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 6] = [
        Self::Greeting,
        Self::VaccinationInfo,
        Self::DiseaseInfo,
        Self::SymptomCheck,
        Self::PreventionInfo,
        Self::GeneralHealth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::VaccinationInfo => "vaccination_info",
            Self::DiseaseInfo => "disease_info",
            Self::SymptomCheck => "symptom_check",
            Self::PreventionInfo => "prevention_info",
            Self::GeneralHealth => "general_health",
        }
    }

    /// Map a free-form key to a template, treating anything unknown as `general_health`.
    pub fn resolve(key: &str) -> Self {
        key.parse().unwrap_or(Self::GeneralHealth)
    }
}

impl FromStr for TemplateKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| CatalogError::Validation(format!("unknown template key '{s}'")))
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advice lines that can appear in a symptom assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKey {
    SeekEmergencyCare,
    CallEmergencyServices,
    #[serde(rename = "consult_within_24_hours")]
    ConsultWithin24Hours,
    MonitorClosely,
    #[serde(rename = "monitor_for_48_hours")]
    MonitorFor48Hours,
    RestAndHydrate,
    ConsultIfWorse,
    MonitorTemperature,
    CoolCompresses,
}

impl RecommendationKey {
    pub const ALL: [RecommendationKey; 9] = [
        Self::SeekEmergencyCare,
        Self::CallEmergencyServices,
        Self::ConsultWithin24Hours,
        Self::MonitorClosely,
        Self::MonitorFor48Hours,
        Self::RestAndHydrate,
        Self::ConsultIfWorse,
        Self::MonitorTemperature,
        Self::CoolCompresses,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SeekEmergencyCare => "seek_emergency_care",
            Self::CallEmergencyServices => "call_emergency_services",
            Self::ConsultWithin24Hours => "consult_within_24_hours",
            Self::MonitorClosely => "monitor_closely",
            Self::MonitorFor48Hours => "monitor_for_48_hours",
            Self::RestAndHydrate => "rest_and_hydrate",
            Self::ConsultIfWorse => "consult_if_worse",
            Self::MonitorTemperature => "monitor_temperature",
            Self::CoolCompresses => "cool_compresses",
        }
    }
}

/// Fixed wording around an assessment reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentLabels {
    pub preface: String,
    pub conditions: String,
    pub recommendations: String,
    pub emergency: String,
    pub disclaimer: String,
    pub match_suffix: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LanguagePack {
    #[serde(default)]
    templates: HashMap<TemplateKey, String>,
    #[serde(default)]
    assessment: Option<AssessmentLabels>,
    #[serde(default)]
    recommendations: HashMap<RecommendationKey, String>,
}

/// All reply text, keyed by language.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseTemplates {
    packs: HashMap<Language, LanguagePack>,
}

impl ResponseTemplates {
    fn lookup<'a, T: ?Sized>(
        &'a self,
        language: Language,
        key: &str,
        get: impl Fn(&'a LanguagePack) -> Option<&'a T>,
    ) -> CatalogResult<&'a T> {
        let requested = self.packs.get(&language).and_then(&get);
        if let Some(found) = requested {
            return Ok(found);
        }
        if language != Language::English {
            tracing::warn!("no {language} entry for '{key}', using english");
        }
        self.packs
            .get(&Language::English)
            .and_then(&get)
            .ok_or_else(|| CatalogError::MissingTemplate {
                language,
                key: key.to_string(),
            })
    }

    /// Template text for `key` in `language`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingTemplate`] if neither `language` nor English has it.
    pub fn template(&self, language: Language, key: TemplateKey) -> CatalogResult<&str> {
        self.lookup(language, key.as_str(), |pack| {
            pack.templates.get(&key).map(String::as_str)
        })
    }

    pub fn assessment_labels(&self, language: Language) -> CatalogResult<&AssessmentLabels> {
        self.lookup(language, "assessment", |pack| pack.assessment.as_ref())
    }

    pub fn recommendation(
        &self,
        language: Language,
        key: RecommendationKey,
    ) -> CatalogResult<&str> {
        self.lookup(language, key.as_str(), |pack| {
            pack.recommendations.get(&key).map(String::as_str)
        })
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        let english = self.packs.get(&Language::English).ok_or_else(|| {
            CatalogError::Validation("responses must include an english section".into())
        })?;
        if !english.templates.contains_key(&TemplateKey::GeneralHealth) {
            return Err(CatalogError::Validation(
                "english responses must define general_health".into(),
            ));
        }
        if english.assessment.is_none() {
            return Err(CatalogError::Validation(
                "english responses must define assessment labels".into(),
            ));
        }
        if let Some(missing) = RecommendationKey::ALL
            .iter()
            .find(|k| !english.recommendations.contains_key(k))
        {
            return Err(CatalogError::Validation(format!(
                "english responses are missing recommendation '{}'",
                missing.as_str()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    fn english_only() -> ResponseTemplates {
        crate::parse_yaml(
            "responses.yaml",
            r#"
english:
  templates:
    general_health: "Ask me anything."
  assessment:
    preface: "p"
    conditions: "c"
    recommendations: "r"
    emergency: "e"
    disclaimer: "d"
    match_suffix: "match"
  recommendations:
    seek_emergency_care: "a"
    call_emergency_services: "b"
    consult_within_24_hours: "c"
    monitor_closely: "d"
    monitor_for_48_hours: "e"
    rest_and_hydrate: "f"
    consult_if_worse: "g"
    monitor_temperature: "h"
    cool_compresses: "i"
hindi:
  templates:
    greeting: "नमस्ते"
"#,
        )
        .expect("test templates should parse")
    }

    #[test]
    fn test_resolve_unknown_key_is_general_health() {
        assert_eq!(TemplateKey::resolve("vaccination_info"), TemplateKey::VaccinationInfo);
        assert_eq!(TemplateKey::resolve("weather_report"), TemplateKey::GeneralHealth);
        assert_eq!(TemplateKey::resolve(""), TemplateKey::GeneralHealth);
    }

    #[test]
    fn test_bundled_templates_in_every_language() {
        let catalog = Catalog::bundled().unwrap();
        let templates = catalog.templates();

        for language in Language::ALL {
            for key in TemplateKey::ALL {
                let text = templates.template(language, key).unwrap();
                assert!(!text.is_empty(), "{language} {key} is empty");
            }
        }
        assert!(templates
            .template(Language::Hindi, TemplateKey::Greeting)
            .unwrap()
            .starts_with("नमस्ते"));
    }

    #[test]
    fn test_missing_entry_falls_back_to_english() {
        let templates = english_only();
        templates.validate().unwrap();

        assert_eq!(
            templates
                .template(Language::Hindi, TemplateKey::GeneralHealth)
                .unwrap(),
            "Ask me anything."
        );
        assert_eq!(
            templates.template(Language::Hindi, TemplateKey::Greeting).unwrap(),
            "नमस्ते"
        );
        assert_eq!(
            templates
                .recommendation(Language::Odia, RecommendationKey::CoolCompresses)
                .unwrap(),
            "i"
        );
    }

    #[test]
    fn test_missing_everywhere_is_an_error() {
        let templates = english_only();
        let err = templates
            .template(Language::Odia, TemplateKey::DiseaseInfo)
            .expect_err("no disease_info anywhere");
        assert!(matches!(
            err,
            CatalogError::MissingTemplate { language: Language::Odia, ref key } if key == "disease_info"
        ));
    }

    #[test]
    fn test_validate_requires_english_general_health() {
        let templates: ResponseTemplates = crate::parse_yaml(
            "responses.yaml",
            "hindi:\n  templates:\n    general_health: \"x\"\n",
        )
        .unwrap();
        assert!(matches!(templates.validate(), Err(CatalogError::Validation(_))));
    }
}
