//! The assistant facade: one entry point that chains extraction, classification, assessment
//! and composition over a shared catalog.

use std::collections::BTreeSet;
use std::sync::Arc;

use aarogya_catalog::{Catalog, TemplateKey};
use aarogya_types::Language;
use serde::Serialize;

use crate::assess::{assess_symptoms, Assessment};
use crate::compose::{compose_response, Reply};
use crate::extract::extract_symptoms;
use crate::intent::{classify_intent, Intent};
use crate::CoreResult;

/// Everything the assistant worked out for one message.
#[derive(Clone, Debug, Serialize)]
pub struct AssistantReply {
    pub intent: Intent,
    pub symptoms: BTreeSet<String>,
    pub assessment: Option<Assessment>,
    pub text: String,
}

/// Stateless health assistant.
///
/// Cheap to clone; all clones share one catalog.
#[derive(Clone, Debug)]
pub struct Assistant {
    catalog: Arc<Catalog>,
}

impl Assistant {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn extract_symptoms(&self, text: &str) -> BTreeSet<String> {
        extract_symptoms(self.catalog.symptoms(), text)
    }

    pub fn classify_intent(&self, text: &str) -> Intent {
        classify_intent(self.catalog.intents(), self.catalog.symptoms(), text)
    }

    pub fn assess_symptoms(&self, symptoms: &BTreeSet<String>) -> Assessment {
        assess_symptoms(self.catalog.conditions(), symptoms)
    }

    pub fn compose_response(&self, reply: Reply<'_>, language: Language) -> CoreResult<String> {
        compose_response(self.catalog.templates(), reply, language)
    }

    pub fn greet(&self, language: Language) -> CoreResult<String> {
        self.compose_response(Reply::Template(TemplateKey::Greeting), language)
    }

    /// Answer one user message.
    ///
    /// Symptom checks with at least one recognised symptom get a full assessment; every other
    /// message gets the template for its intent.
    pub fn respond(&self, text: &str, language: Language) -> CoreResult<AssistantReply> {
        let intent = self.classify_intent(text);
        let symptoms = self.extract_symptoms(text);

        let assessment = (intent == Intent::SymptomCheck && !symptoms.is_empty())
            .then(|| self.assess_symptoms(&symptoms));

        let text = match &assessment {
            Some(assessment) => self.compose_response(assessment.into(), language)?,
            None => self.compose_response(intent.into(), language)?,
        };

        tracing::info!(%intent, %language, symptoms = symptoms.len(), "answered message");
        Ok(AssistantReply {
            intent,
            symptoms,
            assessment,
            text,
        })
    }
}
