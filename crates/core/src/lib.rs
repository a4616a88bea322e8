//! # Aarogya Core
//!
//! Core logic for the Aarogya multilingual health assistant.
//!
//! This crate contains the message pipeline and the services around it:
//! - symptom extraction, intent classification, condition scoring and reply composition
//! - the [`Assistant`] facade and transient [`ChatSession`]s
//! - the [`AuthProvider`] and [`ProfileStore`] seams with local implementations
//! - WhatsApp link generation
//!
//! **No API concerns**: HTTP servers and request parsing belong in `api-rest` and
//! `api-shared`. Matching functions are pure; only the profile store touches the filesystem.

pub mod assess;
pub mod assistant;
pub mod auth;
pub mod chat;
pub mod compose;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod intent;
pub mod messaging;
pub mod profile;

pub use aarogya_catalog::{AlertSeverity, Catalog, CatalogError, ConditionQuery, TemplateKey};
pub use aarogya_types::Language;
pub use aarogya_uuid::UserId;

pub use assess::{assess_symptoms, Assessment, ScoredCondition, Urgency};
pub use assistant::{Assistant, AssistantReply};
pub use auth::{AuthEvent, AuthListener, AuthProvider, AuthUser, ListenerId, LocalAuthProvider, Session};
pub use chat::{ChatMessage, ChatSession, Sender};
pub use compose::{compose_response, Reply};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use extract::extract_symptoms;
pub use intent::{classify_intent, Intent};
pub use messaging::{WhatsAppLink, WhatsAppLinker};
pub use profile::{
    FileProfileStore, Gender, NewVaccineRecord, ProfileStore, UserProfile, VaccineRecord,
    VaccineStatus,
};

use std::sync::Arc;

/// Load the catalog named by `cfg`, or the bundled one when no override directory is set.
///
/// # Errors
///
/// Returns [`CoreError::Catalog`] if any catalog file fails to parse or validate.
pub fn load_catalog(cfg: &CoreConfig) -> CoreResult<Arc<Catalog>> {
    let catalog = match cfg.catalog_dir() {
        Some(dir) => Catalog::from_dir(dir)?,
        None => Catalog::bundled()?,
    };
    Ok(Arc::new(catalog))
}
