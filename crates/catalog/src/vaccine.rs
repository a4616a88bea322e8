use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Language;

/// A vaccine entry from `vaccines.yaml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vaccine {
    pub id: String,
    pub name: String,
    pub age_groups: Vec<String>,
    pub schedule: String,
    pub description: String,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub translations: HashMap<Language, VaccineTranslation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaccineTranslation {
    pub name: Option<String>,
    pub description: Option<String>,
    pub side_effects: Option<Vec<String>>,
    pub contraindications: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocalizedVaccine {
    pub id: String,
    pub name: String,
    pub age_groups: Vec<String>,
    pub schedule: String,
    pub description: String,
    pub side_effects: Vec<String>,
    pub contraindications: Vec<String>,
}

impl Vaccine {
    /// True when `age_group` and one of the listed groups contain each other, ignoring case.
    pub fn covers_age_group(&self, age_group: &str) -> bool {
        let wanted = age_group.trim().to_lowercase();
        self.age_groups.iter().any(|group| {
            let group = group.to_lowercase();
            group.contains(&wanted) || wanted.contains(&group)
        })
    }

    pub fn localized(&self, language: Language) -> LocalizedVaccine {
        let t = self.translations.get(&language);
        LocalizedVaccine {
            id: self.id.clone(),
            name: t
                .and_then(|t| t.name.clone())
                .unwrap_or_else(|| self.name.clone()),
            age_groups: self.age_groups.clone(),
            schedule: self.schedule.clone(),
            description: t
                .and_then(|t| t.description.clone())
                .unwrap_or_else(|| self.description.clone()),
            side_effects: t
                .and_then(|t| t.side_effects.clone())
                .unwrap_or_else(|| self.side_effects.clone()),
            contraindications: t
                .and_then(|t| t.contraindications.clone())
                .unwrap_or_else(|| self.contraindications.clone()),
        }
    }
}
