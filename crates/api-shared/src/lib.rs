//! # API Shared
//!
//! Shared definitions for the Aarogya APIs.
//!
//! Contains:
//! - Wire types (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//! - API key validation
//!
//! Used by `api-rest` for common functionality.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{validate_api_key, ApiKeyError};
pub use dto::*;
pub use health::HealthService;
