use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CatalogError, Language};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            other => Err(CatalogError::Validation(format!(
                "unknown alert severity '{other}'"
            ))),
        }
    }
}

/// A public health alert from `alerts.yaml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthAlert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub location: String,
    pub date: NaiveDate,
    pub source: String,
    #[serde(default)]
    pub translations: HashMap<Language, AlertTranslation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertTranslation {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocalizedAlert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub location: String,
    pub date: NaiveDate,
    pub source: String,
}

impl HealthAlert {
    pub fn localized(&self, language: Language) -> LocalizedAlert {
        let t = self.translations.get(&language);
        LocalizedAlert {
            id: self.id.clone(),
            title: t
                .and_then(|t| t.title.clone())
                .unwrap_or_else(|| self.title.clone()),
            description: t
                .and_then(|t| t.description.clone())
                .unwrap_or_else(|| self.description.clone()),
            severity: self.severity,
            location: self.location.clone(),
            date: self.date,
            source: self.source.clone(),
        }
    }
}
