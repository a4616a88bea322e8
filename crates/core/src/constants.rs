//! Constants used throughout the Aarogya core crate.
//!
//! Path and filename constants live here so storage layout stays consistent.

/// Default directory for user data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "aarogya_data";

/// Directory name for profile storage under the data directory.
pub const PROFILES_DIR_NAME: &str = "profiles";

/// Filename for a user's profile JSON.
pub const PROFILE_JSON_FILENAME: &str = "profile.json";

/// Filename for a user's vaccination history JSON.
pub const VACCINATIONS_JSON_FILENAME: &str = "vaccinations.json";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Recipient used for messaging links when none is configured.
pub const FALLBACK_WHATSAPP_NUMBER: &str = "919917250558";

/// Base URL for prefilled WhatsApp conversations.
pub const WHATSAPP_SEND_URL: &str = "https://api.whatsapp.com/send";

/// Maximum number of conditions reported in an assessment.
pub const MAX_REPORTED_CONDITIONS: usize = 3;

/// Upper bound on a condition match score, in percent.
pub const MAX_MATCH_SCORE: f64 = 85.0;

/// Length in bytes of a random session token before encoding.
pub const SESSION_TOKEN_BYTES: usize = 32;
