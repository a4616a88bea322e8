//! User identifiers and sharded-path utilities.
//!
//! Aarogya stores per-user profile data under sharded directories derived from the user's id.
//! Identifiers use a *canonical* representation: **32 lowercase hexadecimal characters** (no
//! hyphens), the same value as `Uuid::new_v4().simple().to_string()`.
//!
//! ## Sharded directory layout
//! For a canonical id `u`, data lives under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `aarogya_data/profiles/55/0e/550e8400e29b41d4a716446655440000/`

mod user_id;

pub use user_id::{Uuid, UserId};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
