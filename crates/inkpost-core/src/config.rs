//! Configuration loading for Inkpost.
//!
//! Configuration comes from three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`<config dir>/inkpost/config.toml` unless a path is given)
//! 3. `INKPOST_*` environment variables
//!
//! ```toml
//! [authority]
//! app_id = "wx0123456789abcdef"
//! app_secret = "..."
//! api_base_url = "https://api.weixin.qq.com/cgi-bin"
//!
//! [cache]
//! buffer_secs = 300
//! warn_lead_secs = 60
//! ```
//!
//! # Usage
//!
//! ```rust
//! use inkpost_core::InkpostConfig;
//!
//! let config = InkpostConfig::from_toml_str("[cache]\nbuffer_secs = 120\n").unwrap();
//! assert_eq!(config.cache.buffer_secs, 120);
//! assert_eq!(config.cache.warn_lead_secs, 60);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default base URL of the publishing platform's API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.weixin.qq.com/cgi-bin";

/// Seconds subtracted from a token's declared lifetime before it is
/// considered expired locally.
pub const DEFAULT_BUFFER_SECS: u64 = 300;

/// Seconds before local expiry at which the early-warning notice fires.
pub const DEFAULT_WARN_LEAD_SECS: u64 = 60;

const ENV_APP_ID: &str = "INKPOST_APP_ID";
const ENV_APP_SECRET: &str = "INKPOST_APP_SECRET";
const ENV_API_BASE_URL: &str = "INKPOST_API_BASE_URL";
const ENV_BUFFER_SECS: &str = "INKPOST_CACHE_BUFFER_SECS";
const ENV_WARN_LEAD_SECS: &str = "INKPOST_CACHE_WARN_LEAD_SECS";

// ============================================================================
// Settings sections
// ============================================================================

/// Credentials and endpoint of the credential authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoritySettings {
    /// Application identifier issued by the platform.
    pub app_id: String,
    /// Application secret issued by the platform.
    pub app_secret: String,
    /// Base URL for API calls.
    pub api_base_url: String,
}

impl Default for AuthoritySettings {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Timing knobs for the credential cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Safety margin subtracted from each token's lifetime.
    pub buffer_secs: u64,
    /// Lead time of the early-warning notice before local expiry.
    pub warn_lead_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            buffer_secs: DEFAULT_BUFFER_SECS,
            warn_lead_secs: DEFAULT_WARN_LEAD_SECS,
        }
    }
}

// ============================================================================
// InkpostConfig
// ============================================================================

/// Top-level Inkpost configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkpostConfig {
    /// Credential authority settings.
    pub authority: AuthoritySettings,
    /// Credential cache settings.
    pub cache: CacheSettings,
}

impl InkpostConfig {
    /// Name used for the config directory and in user-facing hints.
    pub fn project_name() -> &'static str {
        "inkpost"
    }

    /// Default location of the config file for this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config path: an explicit path wins over the default.
    pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_path(),
        }
    }

    /// Load configuration from a file (if it exists) and the environment.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_overrides(path, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load), but overrides come from `lookup` instead
    /// of the process environment.
    pub fn load_with_overrides<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::resolve_config_path(path) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                log::debug!("Loading configuration from {}", path.display());
                Self::from_toml_str(&content).map_err(|e| {
                    Error::config(format!("Failed to parse {}: {e}", path.display()))
                })?
            }
            Some(path) => {
                log::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(lookup);
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::parse(e.to_string()))
    }

    /// Serialize the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Apply `INKPOST_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Numeric values that fail to parse are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_APP_ID) {
            self.authority.app_id = value;
        }
        if let Some(value) = lookup(ENV_APP_SECRET) {
            self.authority.app_secret = value;
        }
        if let Some(value) = lookup(ENV_API_BASE_URL) {
            self.authority.api_base_url = value;
        }
        if let Some(value) = lookup(ENV_BUFFER_SECS) {
            override_number(ENV_BUFFER_SECS, &value, &mut self.cache.buffer_secs);
        }
        if let Some(value) = lookup(ENV_WARN_LEAD_SECS) {
            override_number(ENV_WARN_LEAD_SECS, &value, &mut self.cache.warn_lead_secs);
        }
    }

    /// Check that everything needed to talk to the authority is present.
    ///
    /// All problems are reported together in one error.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.authority.app_id.trim().is_empty() {
            problems.push(format!("{ENV_APP_ID} is required"));
        }
        if self.authority.app_secret.trim().is_empty() {
            problems.push(format!("{ENV_APP_SECRET} is required"));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::config(format!(
                "validation failed:\n{}",
                problems.join("\n")
            )))
        }
    }

    /// A loggable view of the configuration with secrets hidden.
    pub fn summary(&self) -> BTreeMap<&'static str, String> {
        let mut summary = BTreeMap::new();

        let app_id = if self.authority.app_id.is_empty() {
            "(not set)".to_string()
        } else {
            let prefix: String = self.authority.app_id.chars().take(8).collect();
            format!("{prefix}...")
        };
        let secret = if self.authority.app_secret.is_empty() {
            "(not set)"
        } else {
            "*** (hidden)"
        };

        summary.insert("app_id", app_id);
        summary.insert("app_secret", secret.to_string());
        summary.insert("api_base_url", self.authority.api_base_url.clone());
        summary.insert("cache_buffer_secs", self.cache.buffer_secs.to_string());
        summary.insert("cache_warn_lead_secs", self.cache.warn_lead_secs.to_string());
        summary
    }
}

fn override_number(key: &str, raw: &str, target: &mut u64) {
    match raw.trim().parse::<u64>() {
        Ok(value) => *target = value,
        Err(_) => log::warn!("Ignoring non-numeric {key}={raw:?}, keeping {target}"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_defaults() {
        let config = InkpostConfig::default();
        assert_eq!(config.authority.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.cache.buffer_secs, 300);
        assert_eq!(config.cache.warn_lead_secs, 60);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = InkpostConfig::from_toml_str("[authority]\napp_id = \"wx123\"\n").unwrap();
        assert_eq!(config.authority.app_id, "wx123");
        assert_eq!(config.authority.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.cache, CacheSettings::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = InkpostConfig::from_toml_str("[cache\nbuffer_secs = ").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = InkpostConfig::default();
        config.authority.app_id = "wx-roundtrip".to_string();
        let text = config.to_toml_string().unwrap();
        assert_eq!(InkpostConfig::from_toml_str(&text).unwrap(), config);
    }

    // ------------------------------------------------------------------------
    // Overrides
    // ------------------------------------------------------------------------

    #[test]
    fn test_overrides_replace_values() {
        let mut config = InkpostConfig::default();
        config.apply_overrides(lookup_from(&[
            ("INKPOST_APP_ID", "wx-env"),
            ("INKPOST_APP_SECRET", "s3cret"),
            ("INKPOST_CACHE_BUFFER_SECS", "120"),
        ]));
        assert_eq!(config.authority.app_id, "wx-env");
        assert_eq!(config.authority.app_secret, "s3cret");
        assert_eq!(config.cache.buffer_secs, 120);
        assert_eq!(config.cache.warn_lead_secs, 60);
    }

    #[test]
    fn test_non_numeric_override_is_ignored() {
        let mut config = InkpostConfig::default();
        config.apply_overrides(lookup_from(&[("INKPOST_CACHE_WARN_LEAD_SECS", "soon")]));
        assert_eq!(config.cache.warn_lead_secs, 60);
    }

    // ------------------------------------------------------------------------
    // Loading from disk
    // ------------------------------------------------------------------------

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cache]\nbuffer_secs = 30\n").unwrap();

        let config = InkpostConfig::load_with_overrides(Some(&path), |_| None).unwrap();
        assert_eq!(config.cache.buffer_secs, 30);
        assert_eq!(config.cache.warn_lead_secs, 60);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = InkpostConfig::load_with_overrides(Some(&path), |_| None).unwrap();
        assert_eq!(config, InkpostConfig::default());
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let err = InkpostConfig::load_with_overrides(Some(&path), |_| None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("config.toml"));
    }

    // ------------------------------------------------------------------------
    // Validation and summary
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_reports_all_missing_fields() {
        let err = InkpostConfig::default().validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("INKPOST_APP_ID is required"));
        assert!(message.contains("INKPOST_APP_SECRET is required"));
    }

    #[test]
    fn test_validate_ok_with_credentials() {
        let mut config = InkpostConfig::default();
        config.authority.app_id = "wx123".to_string();
        config.authority.app_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary_hides_secret() {
        let mut config = InkpostConfig::default();
        config.authority.app_id = "wx0123456789abcdef".to_string();
        config.authority.app_secret = "super-secret".to_string();

        let summary = config.summary();
        assert_eq!(summary["app_id"], "wx012345...");
        assert_eq!(summary["app_secret"], "*** (hidden)");
        assert!(!summary.values().any(|v| v.contains("super-secret")));
    }

    #[test]
    fn test_summary_unset_values() {
        let summary = InkpostConfig::default().summary();
        assert_eq!(summary["app_id"], "(not set)");
        assert_eq!(summary["app_secret"], "(not set)");
    }

    #[test]
    fn test_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[authority]\napp_id = \"from-file\"\n").unwrap();

        let config = InkpostConfig::load_with_overrides(
            Some(&path),
            lookup_from(&[("INKPOST_APP_ID", "from-env")]),
        )
        .unwrap();
        assert_eq!(config.authority.app_id, "from-env");
    }

    #[test]
    fn test_resolve_config_path_prefers_explicit() {
        let explicit = Path::new("/etc/inkpost.toml");
        assert_eq!(
            InkpostConfig::resolve_config_path(Some(explicit)),
            Some(explicit.to_path_buf())
        );
    }
}
