//! Health catalogs and their YAML wire formats.
//!
//! This crate owns every piece of static reference data the assistant works from:
//! - conditions (symptoms, severity, per-language translations)
//! - vaccines and public health alerts
//! - the symptom keyword dictionary and intent keyword sets
//! - per-language reply templates
//!
//! A default copy of each catalog file is compiled into the binary. Deployments can point
//! [`Catalog::from_dir`] at a directory holding replacement files; any file missing from that
//! directory falls back to the bundled copy.
//!
//! Catalogs are loaded once, validated, and then only read.

pub mod alert;
pub mod condition;
pub mod keywords;
pub mod templates;
pub mod vaccine;

use std::collections::HashSet;
use std::path::Path;

pub use aarogya_types::Language;
pub use alert::{AlertSeverity, HealthAlert, LocalizedAlert};
pub use condition::{Condition, ConditionQuery, LocalizedCondition, Severity};
pub use keywords::{IntentKeywords, SymptomCategory, SymptomDictionary};
pub use templates::{AssessmentLabels, RecommendationKey, ResponseTemplates, TemplateKey};
pub use vaccine::{LocalizedVaccine, Vaccine};

/// File name of the conditions catalog.
pub const CONDITIONS_FILE: &str = "conditions.yaml";
/// File name of the vaccines catalog.
pub const VACCINES_FILE: &str = "vaccines.yaml";
/// File name of the health alerts catalog.
pub const ALERTS_FILE: &str = "alerts.yaml";
/// File name of the symptom keyword dictionary.
pub const SYMPTOMS_FILE: &str = "symptoms.yaml";
/// File name of the intent keyword sets.
pub const INTENTS_FILE: &str = "intents.yaml";
/// File name of the reply templates.
pub const RESPONSES_FILE: &str = "responses.yaml";

const BUNDLED_CONDITIONS: &str = include_str!("../data/conditions.yaml");
const BUNDLED_VACCINES: &str = include_str!("../data/vaccines.yaml");
const BUNDLED_ALERTS: &str = include_str!("../data/alerts.yaml");
const BUNDLED_SYMPTOMS: &str = include_str!("../data/symptoms.yaml");
const BUNDLED_INTENTS: &str = include_str!("../data/intents.yaml");
const BUNDLED_RESPONSES: &str = include_str!("../data/responses.yaml");

/// Errors returned by the catalog crate.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{file} schema mismatch at {path}: {message}")]
    Schema {
        file: String,
        path: String,
        message: String,
    },

    #[error("I/O error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Validation(String),

    #[error("no '{key}' template for {language} or english")]
    MissingTemplate { language: Language, key: String },
}

/// Type alias for Results that can fail with a [`CatalogError`].
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Parse one catalog file, reporting the failing field path on schema mismatch.
pub(crate) fn parse_yaml<T>(file: &str, yaml_text: &str) -> CatalogResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    serde_path_to_error::deserialize::<_, T>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        CatalogError::Schema {
            file: file.to_string(),
            path: if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            },
            message: source.to_string(),
        }
    })
}

/// Immutable reference data for the assistant.
///
/// Construct once at startup, wrap in an `Arc`, and pass it to whatever needs it.
#[derive(Clone, Debug)]
pub struct Catalog {
    conditions: Vec<Condition>,
    vaccines: Vec<Vaccine>,
    alerts: Vec<HealthAlert>,
    symptoms: SymptomDictionary,
    intents: IntentKeywords,
    templates: ResponseTemplates,
}

impl Catalog {
    /// Load the catalogs compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if a bundled file fails to parse or validate.
    pub fn bundled() -> CatalogResult<Self> {
        Self::from_sources(|_| Ok(None))
    }

    /// Load catalogs from `dir`, using the bundled copy for any file not present there.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if a present file cannot be read, or a schema/validation
    /// error if any file is malformed.
    pub fn from_dir(dir: &Path) -> CatalogResult<Self> {
        Self::from_sources(|file| {
            let path = dir.join(file);
            if !path.is_file() {
                return Ok(None);
            }
            tracing::info!("loading catalog override {}", path.display());
            std::fs::read_to_string(&path)
                .map(Some)
                .map_err(|source| CatalogError::Io {
                    file: path.display().to_string(),
                    source,
                })
        })
    }

    fn from_sources<F>(read_override: F) -> CatalogResult<Self>
    where
        F: Fn(&str) -> CatalogResult<Option<String>>,
    {
        let load = |file: &str, bundled: &'static str| -> CatalogResult<String> {
            Ok(read_override(file)?.unwrap_or_else(|| bundled.to_string()))
        };

        let catalog = Self {
            conditions: parse_yaml(CONDITIONS_FILE, &load(CONDITIONS_FILE, BUNDLED_CONDITIONS)?)?,
            vaccines: parse_yaml(VACCINES_FILE, &load(VACCINES_FILE, BUNDLED_VACCINES)?)?,
            alerts: parse_yaml(ALERTS_FILE, &load(ALERTS_FILE, BUNDLED_ALERTS)?)?,
            symptoms: parse_yaml(SYMPTOMS_FILE, &load(SYMPTOMS_FILE, BUNDLED_SYMPTOMS)?)?,
            intents: parse_yaml(INTENTS_FILE, &load(INTENTS_FILE, BUNDLED_INTENTS)?)?,
            templates: parse_yaml(RESPONSES_FILE, &load(RESPONSES_FILE, BUNDLED_RESPONSES)?)?,
        };
        catalog.validate()?;

        tracing::debug!(
            conditions = catalog.conditions.len(),
            vaccines = catalog.vaccines.len(),
            alerts = catalog.alerts.len(),
            symptom_categories = catalog.symptoms.categories().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Replace the condition catalog, keeping everything else.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the new conditions are invalid.
    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> CatalogResult<Self> {
        self.conditions = conditions;
        self.validate()?;
        Ok(self)
    }

    /// Replace the symptom keyword dictionary, keeping everything else.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the dictionary is invalid.
    pub fn with_symptoms(mut self, symptoms: SymptomDictionary) -> CatalogResult<Self> {
        self.symptoms = symptoms;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> CatalogResult<()> {
        ensure_unique_ids("condition", self.conditions.iter().map(|c| c.id.as_str()))?;
        ensure_unique_ids("vaccine", self.vaccines.iter().map(|v| v.id.as_str()))?;
        ensure_unique_ids("alert", self.alerts.iter().map(|a| a.id.as_str()))?;
        self.symptoms.validate()?;
        self.templates.validate()?;
        Ok(())
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn condition(&self, id: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// Conditions matching the query, in catalog order.
    pub fn search_conditions(&self, query: &ConditionQuery) -> Vec<&Condition> {
        self.conditions.iter().filter(|c| query.matches(c)).collect()
    }

    /// Distinct condition categories in first-seen order.
    pub fn condition_categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.conditions
            .iter()
            .map(|c| c.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    pub fn vaccines(&self) -> &[Vaccine] {
        &self.vaccines
    }

    /// Vaccines offered to `age_group`, or all vaccines when no group is given.
    pub fn vaccines_for_age_group(&self, age_group: Option<&str>) -> Vec<&Vaccine> {
        match age_group.map(str::trim).filter(|g| !g.is_empty()) {
            None => self.vaccines.iter().collect(),
            Some(group) => self
                .vaccines
                .iter()
                .filter(|v| v.covers_age_group(group))
                .collect(),
        }
    }

    /// Health alerts, newest first, optionally restricted to one severity.
    pub fn alerts(&self, severity: Option<AlertSeverity>) -> Vec<&HealthAlert> {
        let mut alerts: Vec<&HealthAlert> = self
            .alerts
            .iter()
            .filter(|a| severity.map_or(true, |s| a.severity == s))
            .collect();
        alerts.sort_by(|a, b| b.date.cmp(&a.date));
        alerts
    }

    pub fn symptoms(&self) -> &SymptomDictionary {
        &self.symptoms
    }

    pub fn intents(&self) -> &IntentKeywords {
        &self.intents
    }

    pub fn templates(&self) -> &ResponseTemplates {
        &self.templates
    }
}

fn ensure_unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(CatalogError::Validation(format!("{kind} id cannot be empty")));
        }
        if !seen.insert(id) {
            return Err(CatalogError::Validation(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().expect("bundled catalog should load");

        assert_eq!(catalog.conditions().len(), 3);
        assert_eq!(catalog.vaccines().len(), 3);
        assert_eq!(catalog.alerts(None).len(), 3);
        assert_eq!(catalog.symptoms().categories().len(), 6);
        assert!(catalog.condition("malaria").is_some());
        assert!(catalog.condition("cholera").is_none());
    }

    #[test]
    fn test_condition_categories_are_distinct_in_catalog_order() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(
            catalog.condition_categories(),
            vec!["Vector-borne Disease", "Metabolic Disorder"]
        );
    }

    #[test]
    fn test_alerts_sorted_newest_first_and_filtered() {
        let catalog = Catalog::bundled().unwrap();

        let ids: Vec<&str> = catalog.alerts(None).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "vaccination-drive-2024",
                "water-contamination-alert",
                "monsoon-diseases-2024"
            ]
        );

        let danger = catalog.alerts(Some(AlertSeverity::Danger));
        assert_eq!(danger.len(), 1);
        assert_eq!(danger[0].id, "water-contamination-alert");
    }

    #[test]
    fn test_vaccines_for_age_group() {
        let catalog = Catalog::bundled().unwrap();

        let ids: Vec<&str> = catalog
            .vaccines_for_age_group(Some("6 months"))
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, vec!["hepatitisb", "tetanus"]);

        assert_eq!(catalog.vaccines_for_age_group(None).len(), 3);
        assert_eq!(catalog.vaccines_for_age_group(Some("  ")).len(), 3);
    }

    #[test]
    fn test_from_dir_overrides_only_present_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            temp_dir.path().join(CONDITIONS_FILE),
            r#"
- id: cholera
  name: "Cholera"
  category: "Waterborne Disease"
  symptoms: ["Diarrhoea", "Vomiting"]
  severity: critical
  contagious: true
"#,
        )
        .unwrap();

        let catalog = Catalog::from_dir(temp_dir.path()).expect("override should load");

        assert_eq!(catalog.conditions().len(), 1);
        assert_eq!(catalog.conditions()[0].severity, Severity::Critical);
        assert_eq!(catalog.vaccines().len(), 3, "vaccines fall back to bundled");
    }

    #[test]
    fn test_schema_mismatch_reports_field_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            temp_dir.path().join(CONDITIONS_FILE),
            r#"
- id: cholera
  name: "Cholera"
  category: "Waterborne Disease"
  symptoms: ["Diarrhoea"]
  severity: apocalyptic
  contagious: true
"#,
        )
        .unwrap();

        let err = Catalog::from_dir(temp_dir.path()).expect_err("bad severity should fail");
        match err {
            CatalogError::Schema { file, path, .. } => {
                assert_eq!(file, CONDITIONS_FILE);
                assert!(path.contains("severity"), "path was {path}");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_conditions_rejects_duplicate_ids() {
        let catalog = Catalog::bundled().unwrap();
        let malaria = catalog.condition("malaria").unwrap().clone();

        let err = catalog
            .with_conditions(vec![malaria.clone(), malaria])
            .expect_err("duplicates should be rejected");
        assert!(matches!(err, CatalogError::Validation(msg) if msg.contains("duplicate")));
    }
}
