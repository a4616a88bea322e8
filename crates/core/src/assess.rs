//! Symptom assessment against the condition catalog.

use std::collections::BTreeSet;

use aarogya_catalog::{Condition, RecommendationKey, Severity};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_MATCH_SCORE, MAX_REPORTED_CONDITIONS};

/// How quickly a user should seek care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Moderate,
    High,
    Emergency,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Emergency => "emergency",
        }
    }
}

impl From<Severity> for Urgency {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => Urgency::Emergency,
            Severity::High => Urgency::High,
            Severity::Moderate => Urgency::Moderate,
            Severity::Low => Urgency::Low,
        }
    }
}

/// A condition that shares at least one symptom with the input.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredCondition {
    pub condition: Condition,
    /// Percentage of the condition's symptoms that were matched, capped at 85.
    pub score: f64,
    pub urgency: Urgency,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Assessment {
    /// At most three conditions, best match first.
    pub conditions: Vec<ScoredCondition>,
    pub recommendations: Vec<RecommendationKey>,
    pub needs_immediate_attention: bool,
}

impl Assessment {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

fn overlaps(symptom: &str, listed: &str) -> bool {
    let listed = listed.to_lowercase();
    let symptom = symptom.to_lowercase();
    listed.contains(&symptom) || symptom.contains(&listed)
}

/// Score every condition against `symptoms` and keep the best three.
///
/// The urgency flag and recommendations consider every matched condition, not only the
/// three reported ones.
pub fn assess_symptoms(conditions: &[Condition], symptoms: &BTreeSet<String>) -> Assessment {
    if symptoms.is_empty() {
        return Assessment::default();
    }

    let mut scored: Vec<ScoredCondition> = conditions
        .iter()
        .filter(|c| !c.symptoms.is_empty())
        .filter_map(|condition| {
            let matched = symptoms
                .iter()
                .filter(|s| condition.symptoms.iter().any(|listed| overlaps(s, listed)))
                .count();
            if matched == 0 {
                return None;
            }
            let score = (matched as f64 / condition.symptoms.len() as f64 * 100.0)
                .min(MAX_MATCH_SCORE);
            Some(ScoredCondition {
                condition: condition.clone(),
                score,
                urgency: condition.severity.into(),
            })
        })
        .collect();

    // sort_by is stable, so equal scores keep catalog order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let needs_immediate_attention = scored
        .iter()
        .any(|c| matches!(c.urgency, Urgency::Emergency | Urgency::High));
    let recommendations = recommend(symptoms, &scored);

    tracing::debug!(
        matched = scored.len(),
        needs_immediate_attention,
        "assessed symptoms"
    );

    scored.truncate(MAX_REPORTED_CONDITIONS);
    Assessment {
        conditions: scored,
        recommendations,
        needs_immediate_attention,
    }
}

fn recommend(symptoms: &BTreeSet<String>, scored: &[ScoredCondition]) -> Vec<RecommendationKey> {
    use RecommendationKey::*;

    let has = |urgency: Urgency| scored.iter().any(|c| c.urgency == urgency);

    let mut out = if has(Urgency::Emergency) {
        vec![SeekEmergencyCare, CallEmergencyServices]
    } else if has(Urgency::High) {
        vec![ConsultWithin24Hours, MonitorClosely]
    } else {
        vec![MonitorFor48Hours, RestAndHydrate, ConsultIfWorse]
    };

    if symptoms.contains("fever") {
        out.extend([MonitorTemperature, CoolCompresses]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aarogya_catalog::Catalog;
    use std::collections::HashMap;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn condition(id: &str, symptoms: &[&str], severity: Severity) -> Condition {
        Condition {
            id: id.into(),
            name: id.to_uppercase(),
            category: "Test".into(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            causes: vec![],
            prevention: vec![],
            treatment: vec![],
            severity,
            contagious: false,
            translations: HashMap::new(),
        }
    }

    #[test]
    fn test_fever_headache_scenario() {
        let catalog = Catalog::bundled().unwrap();
        let assessment = assess_symptoms(catalog.conditions(), &set(&["fever", "headache", "pain"]));

        let ids: Vec<&str> = assessment
            .conditions
            .iter()
            .map(|c| c.condition.id.as_str())
            .collect();
        assert_eq!(ids, vec!["dengue", "malaria"]);
        assert_eq!(assessment.conditions[0].score, 50.0);
        assert!((assessment.conditions[1].score - 100.0 / 3.0).abs() < 1e-9);
        assert!(assessment.needs_immediate_attention);
        assert_eq!(
            assessment.recommendations,
            vec![
                RecommendationKey::ConsultWithin24Hours,
                RecommendationKey::MonitorClosely,
                RecommendationKey::MonitorTemperature,
                RecommendationKey::CoolCompresses,
            ]
        );
    }

    #[test]
    fn test_urgency_names_match_serde() {
        for urgency in [Urgency::Low, Urgency::Moderate, Urgency::High, Urgency::Emergency] {
            assert_eq!(
                serde_json::to_value(urgency).unwrap(),
                serde_json::Value::from(urgency.as_str())
            );
        }
        assert_eq!(Urgency::from(Severity::Critical).as_str(), "emergency");
    }

    #[test]
    fn test_empty_symptoms_give_empty_assessment() {
        let catalog = Catalog::bundled().unwrap();
        let assessment = assess_symptoms(catalog.conditions(), &BTreeSet::new());
        assert!(assessment.is_empty());
        assert!(assessment.recommendations.is_empty());
        assert!(!assessment.needs_immediate_attention);
    }

    #[test]
    fn test_score_is_capped() {
        let conditions = vec![condition("flu", &["Fever"], Severity::Low)];
        let assessment = assess_symptoms(&conditions, &set(&["fever"]));
        assert_eq!(assessment.conditions[0].score, 85.0);
    }

    #[test]
    fn test_moderate_only_recommendations() {
        let catalog = Catalog::bundled().unwrap();
        let assessment = assess_symptoms(catalog.conditions(), &set(&["fatigue"]));

        assert_eq!(assessment.conditions.len(), 1);
        assert_eq!(assessment.conditions[0].condition.id, "diabetes");
        assert_eq!(assessment.conditions[0].urgency, Urgency::Moderate);
        assert!(!assessment.needs_immediate_attention);
        assert_eq!(
            assessment.recommendations,
            vec![
                RecommendationKey::MonitorFor48Hours,
                RecommendationKey::RestAndHydrate,
                RecommendationKey::ConsultIfWorse,
            ]
        );
    }

    #[test]
    fn test_emergency_recommendations() {
        let conditions = vec![condition("sepsis", &["Fever", "Confusion"], Severity::Critical)];
        let assessment = assess_symptoms(&conditions, &set(&["fever"]));

        assert_eq!(assessment.conditions[0].urgency, Urgency::Emergency);
        assert!(assessment.needs_immediate_attention);
        assert_eq!(
            assessment.recommendations[..2],
            [
                RecommendationKey::SeekEmergencyCare,
                RecommendationKey::CallEmergencyServices
            ]
        );
    }

    #[test]
    fn test_flag_considers_conditions_beyond_top_three() {
        let conditions = vec![
            condition("a", &["Cough"], Severity::Low),
            condition("b", &["Cough", "Sneeze"], Severity::Low),
            condition("c", &["Cough", "Sneeze", "Itch"], Severity::Moderate),
            condition("d", &["Cough", "Sneeze", "Itch", "Wheeze"], Severity::High),
        ];
        let assessment = assess_symptoms(&conditions, &set(&["cough"]));

        let ids: Vec<&str> = assessment
            .conditions
            .iter()
            .map(|c| c.condition.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(assessment.needs_immediate_attention);
        assert_eq!(
            assessment.recommendations,
            vec![
                RecommendationKey::ConsultWithin24Hours,
                RecommendationKey::MonitorClosely
            ]
        );
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let conditions = vec![
            condition("first", &["Cough", "Cold"], Severity::Low),
            condition("second", &["Cough", "Fever"], Severity::Low),
        ];
        let assessment = assess_symptoms(&conditions, &set(&["cough"]));
        assert_eq!(assessment.conditions[0].condition.id, "first");
        assert_eq!(assessment.conditions[1].condition.id, "second");
    }
}
