//! Reply composition.

use std::fmt::Write as _;

use aarogya_catalog::{ResponseTemplates, TemplateKey};
use aarogya_types::Language;

use crate::assess::Assessment;
use crate::intent::Intent;
use crate::CoreResult;

/// What a reply should say.
#[derive(Clone, Copy, Debug)]
pub enum Reply<'a> {
    /// A fixed per-language template.
    Template(TemplateKey),
    /// A rendered symptom assessment.
    Assessment(&'a Assessment),
}

impl Reply<'_> {
    /// Template reply for a free-form key. Unknown keys become `general_health`.
    pub fn from_key(key: &str) -> Self {
        Reply::Template(TemplateKey::resolve(key))
    }
}

impl From<Intent> for Reply<'_> {
    fn from(intent: Intent) -> Self {
        Reply::Template(intent.template_key())
    }
}

impl<'a> From<&'a Assessment> for Reply<'a> {
    fn from(assessment: &'a Assessment) -> Self {
        Reply::Assessment(assessment)
    }
}

/// Render `reply` in `language`.
///
/// Entries missing for `language` are taken from English.
///
/// # Errors
///
/// Returns [`crate::CoreError::Catalog`] only when an entry is missing in both `language` and
/// English, which a validated catalog rules out for everything but optional templates.
pub fn compose_response(
    templates: &ResponseTemplates,
    reply: Reply<'_>,
    language: Language,
) -> CoreResult<String> {
    match reply {
        Reply::Template(key) => Ok(templates.template(language, key)?.to_string()),
        Reply::Assessment(assessment) => render_assessment(templates, assessment, language),
    }
}

fn render_assessment(
    templates: &ResponseTemplates,
    assessment: &Assessment,
    language: Language,
) -> CoreResult<String> {
    let labels = templates.assessment_labels(language)?;
    let mut out = String::new();

    out.push_str(&labels.preface);
    out.push_str("\n\n");

    if assessment.needs_immediate_attention {
        out.push_str(&labels.emergency);
        out.push_str("\n\n");
    }

    if !assessment.conditions.is_empty() {
        out.push_str(&labels.conditions);
        out.push('\n');
        for (index, scored) in assessment.conditions.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} ({}% {})",
                index + 1,
                scored.condition.display_name(language),
                scored.score.round() as u32,
                labels.match_suffix
            );
        }
        out.push('\n');
    }

    out.push_str(&labels.recommendations);
    out.push('\n');
    for key in &assessment.recommendations {
        let _ = writeln!(out, "• {}", templates.recommendation(language, *key)?);
    }

    out.push('\n');
    out.push_str(&labels.disclaimer);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::assess_symptoms;
    use aarogya_catalog::Catalog;
    use std::collections::BTreeSet;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_hindi_greeting() {
        let catalog = Catalog::bundled().unwrap();
        let text = compose_response(
            catalog.templates(),
            Reply::from_key("greeting"),
            Language::Hindi,
        )
        .unwrap();
        assert!(text.starts_with("नमस्ते! मैं आपका स्वास्थ्य सहायक हूं।"));
    }

    #[test]
    fn test_unknown_language_uses_english() {
        let catalog = Catalog::bundled().unwrap();
        let text = compose_response(
            catalog.templates(),
            Reply::from_key("greeting"),
            Language::resolve("klingon"),
        )
        .unwrap();
        assert!(text.starts_with("Hello! I'm your health assistant."));
    }

    #[test]
    fn test_unknown_key_uses_general_health() {
        let catalog = Catalog::bundled().unwrap();
        let text =
            compose_response(catalog.templates(), Reply::from_key("horoscope"), Language::Odia)
                .unwrap();
        let expected = catalog
            .templates()
            .template(Language::Odia, TemplateKey::GeneralHealth)
            .unwrap();
        assert_eq!(text, expected);
    }

    #[test]
    fn test_intent_reply() {
        let catalog = Catalog::bundled().unwrap();
        let text = compose_response(
            catalog.templates(),
            Intent::VaccinationInfo.into(),
            Language::English,
        )
        .unwrap();
        assert!(text.contains("vaccination schedules"));
    }

    #[test]
    fn test_english_assessment_layout() {
        let catalog = Catalog::bundled().unwrap();
        let assessment = assess_symptoms(catalog.conditions(), &set(&["fever", "headache", "pain"]));

        let text =
            compose_response(catalog.templates(), (&assessment).into(), Language::English).unwrap();

        let expected = "Based on your symptoms, here's what I found:\n\n\
            ⚠️ This may require immediate medical attention!\n\n\
            Possible conditions:\n\
            1. Dengue Fever (50% match)\n\
            2. Malaria (33% match)\n\
            \n\
            My recommendations:\n\
            • Consult a healthcare provider within 24 hours\n\
            • Monitor symptoms closely\n\
            • Keep body temperature monitored\n\
            • Use cool compresses and stay hydrated\n\
            \n\
            This is preliminary guidance only. Please consult a healthcare professional for proper diagnosis.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_assessment_without_flag_or_conditions() {
        let catalog = Catalog::bundled().unwrap();
        let assessment = assess_symptoms(catalog.conditions(), &set(&["cough"]));
        assert!(assessment.is_empty());

        let text =
            compose_response(catalog.templates(), (&assessment).into(), Language::English).unwrap();
        assert!(!text.contains("⚠️"));
        assert!(!text.contains("Possible conditions:"));
        assert!(text.starts_with("Based on your symptoms"));
    }

    #[test]
    fn test_odia_assessment_uses_translated_names() {
        let catalog = Catalog::bundled().unwrap();
        let assessment = assess_symptoms(catalog.conditions(), &set(&["fatigue"]));

        let text =
            compose_response(catalog.templates(), (&assessment).into(), Language::Odia).unwrap();
        assert!(text.contains("1. ମଧୁମେହ (17% ମେଳ)"));
        assert!(text.contains("• ବିଶ୍ରାମ ନିଅନ୍ତୁ ଓ ପର୍ଯ୍ୟାପ୍ତ ପାଣି ପିଅନ୍ତୁ"));
    }
}
