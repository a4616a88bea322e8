//! Request and response bodies.
//!
//! Every type here is plain serde with an OpenAPI schema. Language fields accept names or
//! ISO 639-1 codes; unrecognised values are answered in English.

use aarogya_catalog::{LocalizedAlert, LocalizedCondition, LocalizedVaccine, ResponseTemplates};
use aarogya_core::{
    Assessment, AssistantReply, CoreResult, Language, Session, UserProfile, VaccineRecord,
    WhatsAppLink,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LanguageQuery {
    /// `english`, `hindi`, `odia` or their ISO codes
    pub language: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GreetingRes {
    pub language: String,
    /// Locale for browser speech recognition and synthesis, e.g. `hi-IN`
    pub speech_locale: String,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    pub text: String,
    pub language: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRes {
    pub language: String,
    pub intent: String,
    pub symptoms: Vec<String>,
    pub assessment: Option<AssessmentRes>,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TextReq {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtractRes {
    pub symptoms: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct IntentRes {
    pub intent: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessReq {
    pub symptoms: Vec<String>,
    pub language: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessRes {
    pub assessment: AssessmentRes,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoredConditionRes {
    pub id: String,
    pub name: String,
    pub score: f64,
    /// Score rounded to a whole percentage
    pub match_percent: u32,
    pub urgency: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentRes {
    pub conditions: Vec<ScoredConditionRes>,
    /// Recommendation text in the requested language
    pub recommendations: Vec<String>,
    pub needs_immediate_attention: bool,
}

impl AssessmentRes {
    /// Render `assessment` with condition names and recommendations in `language`.
    pub fn render(
        assessment: &Assessment,
        templates: &ResponseTemplates,
        language: Language,
    ) -> CoreResult<Self> {
        let recommendations = assessment
            .recommendations
            .iter()
            .map(|key| -> CoreResult<String> {
                Ok(templates.recommendation(language, *key)?.to_string())
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            conditions: assessment
                .conditions
                .iter()
                .map(|scored| ScoredConditionRes {
                    id: scored.condition.id.clone(),
                    name: scored.condition.display_name(language).to_string(),
                    score: scored.score,
                    match_percent: scored.score.round() as u32,
                    urgency: scored.urgency.as_str().to_string(),
                })
                .collect(),
            recommendations,
            needs_immediate_attention: assessment.needs_immediate_attention,
        })
    }
}

impl ChatRes {
    pub fn render(
        reply: AssistantReply,
        templates: &ResponseTemplates,
        language: Language,
    ) -> CoreResult<Self> {
        let assessment = reply
            .assessment
            .as_ref()
            .map(|a| AssessmentRes::render(a, templates, language))
            .transpose()?;
        Ok(Self {
            language: language.to_string(),
            intent: reply.intent.to_string(),
            symptoms: reply.symptoms.into_iter().collect(),
            assessment,
            text: reply.text,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConditionsQuery {
    /// Case-insensitive match on name or symptom
    pub q: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConditionRes {
    pub id: String,
    pub name: String,
    pub category: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub prevention: Vec<String>,
    pub treatment: Vec<String>,
    pub severity: String,
    pub contagious: bool,
}

impl From<LocalizedCondition> for ConditionRes {
    fn from(c: LocalizedCondition) -> Self {
        Self {
            id: c.id,
            name: c.name,
            category: c.category,
            symptoms: c.symptoms,
            causes: c.causes,
            prevention: c.prevention,
            treatment: c.treatment,
            severity: format!("{:?}", c.severity).to_lowercase(),
            contagious: c.contagious,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListConditionsRes {
    pub conditions: Vec<ConditionRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoriesRes {
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VaccinesQuery {
    /// Matches when either this value or a listed age group contains the other
    pub age_group: Option<String>,
    pub language: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VaccineRes {
    pub id: String,
    pub name: String,
    pub age_groups: Vec<String>,
    pub schedule: String,
    pub description: String,
    pub side_effects: Vec<String>,
    pub contraindications: Vec<String>,
}

impl From<LocalizedVaccine> for VaccineRes {
    fn from(v: LocalizedVaccine) -> Self {
        Self {
            id: v.id,
            name: v.name,
            age_groups: v.age_groups,
            schedule: v.schedule,
            description: v.description,
            side_effects: v.side_effects,
            contraindications: v.contraindications,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListVaccinesRes {
    pub vaccines: Vec<VaccineRes>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertsQuery {
    /// `info`, `warning` or `danger`; omit for all
    pub severity: Option<String>,
    pub language: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertRes {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub location: String,
    /// ISO 8601 date
    pub date: String,
    pub source: String,
}

impl From<LocalizedAlert> for AlertRes {
    fn from(a: LocalizedAlert) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            severity: a.severity.as_str().to_string(),
            location: a.location,
            date: a.date.to_string(),
            source: a.source,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListAlertsRes {
    pub alerts: Vec<AlertRes>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WhatsAppQuery {
    /// Prefilled text; defaults to a localized greeting
    pub message: Option<String>,
    pub language: Option<String>,
    /// Overrides User-Agent based mobile detection
    pub mobile: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WhatsAppRes {
    pub url: String,
    pub button_text: String,
}

impl From<WhatsAppLink> for WhatsAppRes {
    fn from(link: WhatsAppLink) -> Self {
        Self {
            url: link.url,
            button_text: link.button_text,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SignUpReq {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SignInReq {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionRes {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub full_name: String,
}

impl From<Session> for SessionRes {
    fn from(s: Session) -> Self {
        Self {
            token: s.token,
            user_id: s.user.id.to_string(),
            email: s.user.email,
            full_name: s.user.full_name,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SignOutRes {
    pub success: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileRes {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub is_diabetic: bool,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u8>,
    pub emergency_contact: Option<String>,
    pub allergies: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub preferred_language: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileRes {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id.to_string(),
            email: p.email,
            full_name: p.full_name,
            phone: p.phone,
            blood_group: p.blood_group,
            is_diabetic: p.is_diabetic,
            address: p.address,
            gender: p.gender.map(|g| format!("{g:?}").to_lowercase()),
            age: p.age,
            emergency_contact: p.emergency_contact,
            allergies: p.allergies,
            chronic_conditions: p.chronic_conditions,
            preferred_language: p.preferred_language.to_string(),
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// Partial profile update. Omitted fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileReq {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub is_diabetic: Option<bool>,
    pub address: Option<String>,
    /// `male`, `female` or `other`
    pub gender: Option<String>,
    pub age: Option<u8>,
    pub emergency_contact: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub chronic_conditions: Option<Vec<String>>,
    pub preferred_language: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VaccinationRecordRes {
    pub id: String,
    pub vaccine_name: String,
    pub date_administered: String,
    pub next_due_date: Option<String>,
    pub status: String,
}

impl From<VaccineRecord> for VaccinationRecordRes {
    fn from(r: VaccineRecord) -> Self {
        Self {
            id: r.id.simple().to_string(),
            vaccine_name: r.vaccine_name,
            date_administered: r.date_administered.to_string(),
            next_due_date: r.next_due_date.map(|d| d.to_string()),
            status: format!("{:?}", r.status).to_lowercase(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewVaccinationReq {
    pub vaccine_name: String,
    /// `YYYY-MM-DD`
    pub date_administered: String,
    pub next_due_date: Option<String>,
    /// `completed`, `upcoming` or `overdue`
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListVaccinationsRes {
    pub records: Vec<VaccinationRecordRes>,
}
