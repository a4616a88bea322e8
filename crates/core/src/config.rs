//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services. Nothing
//! in this crate reads environment variables while handling a request.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use aarogya_types::Language;

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_REST_ADDR, PROFILES_DIR_NAME};
use crate::{CoreError, CoreResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    catalog_dir: Option<PathBuf>,
    default_language: Language,
    whatsapp_number: Option<String>,
    rest_addr: SocketAddr,
}

impl CoreConfig {
    pub fn new(
        data_dir: PathBuf,
        catalog_dir: Option<PathBuf>,
        default_language: Language,
        whatsapp_number: Option<String>,
        rest_addr: SocketAddr,
    ) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidConfig("data_dir cannot be empty".into()));
        }
        if let Some(dir) = &catalog_dir {
            if !dir.is_dir() {
                return Err(CoreError::InvalidConfig(format!(
                    "catalog directory {} does not exist",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            data_dir,
            catalog_dir,
            default_language,
            whatsapp_number: whatsapp_number
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            rest_addr,
        })
    }

    /// Resolve the process environment.
    ///
    /// # Environment Variables
    /// - `AAROGYA_DATA_DIR`: profile store root (default: "aarogya_data")
    /// - `AAROGYA_CATALOG_DIR`: directory of catalog YAML overrides (optional)
    /// - `AAROGYA_DEFAULT_LANGUAGE`: language used when a request names none (default: "english")
    /// - `WHATSAPP_NUMBER`: helpline number for WhatsApp links (optional)
    /// - `AAROGYA_REST_ADDR`: REST bind address (default: "0.0.0.0:3000")
    pub fn from_env() -> CoreResult<Self> {
        Self::from_env_values(
            std::env::var("AAROGYA_DATA_DIR").ok(),
            std::env::var("AAROGYA_CATALOG_DIR").ok(),
            std::env::var("AAROGYA_DEFAULT_LANGUAGE").ok(),
            std::env::var("WHATSAPP_NUMBER").ok(),
            std::env::var("AAROGYA_REST_ADDR").ok(),
        )
    }

    /// Build a configuration from raw environment values.
    ///
    /// Each argument is the value of the matching variable, if set:
    /// `AAROGYA_DATA_DIR`, `AAROGYA_CATALOG_DIR`, `AAROGYA_DEFAULT_LANGUAGE`,
    /// `WHATSAPP_NUMBER` and `AAROGYA_REST_ADDR`.
    pub fn from_env_values(
        data_dir: Option<String>,
        catalog_dir: Option<String>,
        default_language: Option<String>,
        whatsapp_number: Option<String>,
        rest_addr: Option<String>,
    ) -> CoreResult<Self> {
        let non_blank = |v: Option<String>| {
            v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let data_dir = non_blank(data_dir).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let default_language = match non_blank(default_language) {
            None => Language::default(),
            Some(value) => value
                .parse::<Language>()
                .map_err(|e| CoreError::InvalidConfig(e.to_string()))?,
        };
        let rest_addr = non_blank(rest_addr)
            .unwrap_or_else(|| DEFAULT_REST_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| CoreError::InvalidConfig(format!("invalid REST address: {e}")))?;

        Self::new(
            PathBuf::from(data_dir),
            non_blank(catalog_dir).map(PathBuf::from),
            default_language,
            non_blank(whatsapp_number),
            rest_addr,
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join(PROFILES_DIR_NAME)
    }

    pub fn catalog_dir(&self) -> Option<&Path> {
        self.catalog_dir.as_deref()
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    pub fn whatsapp_number(&self) -> Option<&str> {
        self.whatsapp_number.as_deref()
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_env_values_defaults() {
        let cfg = CoreConfig::from_env_values(None, None, None, None, None).unwrap();

        assert_eq!(cfg.data_dir(), Path::new(DEFAULT_DATA_DIR));
        assert_eq!(cfg.profiles_dir(), Path::new("aarogya_data/profiles"));
        assert!(cfg.catalog_dir().is_none());
        assert_eq!(cfg.default_language(), Language::English);
        assert!(cfg.whatsapp_number().is_none());
        assert_eq!(cfg.rest_addr().port(), 3000);
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("AAROGYA_DEFAULT_LANGUAGE", "odia");
        std::env::set_var("AAROGYA_REST_ADDR", "127.0.0.1:9090");
        let cfg = CoreConfig::from_env();
        std::env::remove_var("AAROGYA_DEFAULT_LANGUAGE");
        std::env::remove_var("AAROGYA_REST_ADDR");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.default_language(), Language::Odia);
        assert_eq!(cfg.rest_addr().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn test_from_env_values_reads_overrides() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::from_env_values(
            Some("/srv/aarogya".into()),
            Some(temp_dir.path().display().to_string()),
            Some("hi".into()),
            Some("  +91 99999 ".into()),
            Some("127.0.0.1:8080".into()),
        )
        .unwrap();

        assert_eq!(cfg.data_dir(), Path::new("/srv/aarogya"));
        assert_eq!(cfg.catalog_dir(), Some(temp_dir.path()));
        assert_eq!(cfg.default_language(), Language::Hindi);
        assert_eq!(cfg.whatsapp_number(), Some("+91 99999"));
        assert_eq!(cfg.rest_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let cfg = CoreConfig::from_env_values(
            Some("   ".into()),
            Some("".into()),
            Some(" ".into()),
            Some("".into()),
            None,
        )
        .unwrap();
        assert_eq!(cfg.data_dir(), Path::new(DEFAULT_DATA_DIR));
        assert!(cfg.whatsapp_number().is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_language =
            CoreConfig::from_env_values(None, None, Some("klingon".into()), None, None);
        assert!(matches!(bad_language, Err(CoreError::InvalidConfig(_))));

        let bad_addr = CoreConfig::from_env_values(None, None, None, None, Some("nowhere".into()));
        assert!(matches!(bad_addr, Err(CoreError::InvalidConfig(_))));

        let missing_catalog = CoreConfig::from_env_values(
            None,
            Some("/definitely/not/here".into()),
            None,
            None,
            None,
        );
        assert!(matches!(missing_catalog, Err(CoreError::InvalidConfig(_))));
    }
}
