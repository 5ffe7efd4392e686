//! Client configuration.
//!
//! Settings come from an `appsettings.json`-style document (only the `Api`
//! section is read) and/or environment variables. Environment variables win.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 20;
pub const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

pub const ENV_BASE_URL: &str = "JOBTRACKER_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "JOBTRACKER_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Upper bound on one call, credential acquisition included.
    pub timeout: Duration,
    pub max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            pool_idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsFile {
    #[serde(default)]
    api: Option<ApiSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiSection {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the `Api` section of a settings document.
    pub fn from_settings_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        Self::from_settings_str(&raw)
    }

    pub fn from_settings_str(raw: &str) -> Result<Self> {
        let settings: SettingsFile =
            serde_json::from_str(raw).map_err(|e| ApiError::Config(e.to_string()))?;
        let mut config = Self::default();
        if let Some(api) = settings.api {
            if let Some(url) = api.base_url.filter(|u| !u.trim().is_empty()) {
                config.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(secs) = api.timeout_seconds {
                config.timeout = Duration::from_secs(secs);
            }
        }
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_TIMEOUT_SECS).ok(),
        )
    }

    fn with_overrides(mut self, base_url: Option<String>, timeout: Option<String>) -> Result<Self> {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = timeout {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_SECS}={secs:?} is not a number")))?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_pool_limits() {
        let c = ClientConfig::default();
        assert_eq!(c.timeout, Duration::from_secs(15));
        assert_eq!(c.max_idle_per_host, 20);
        assert_eq!(c.pool_idle_timeout, Duration::from_secs(300));
    }

    #[test]
    fn settings_document_reads_api_section() {
        let c = ClientConfig::from_settings_str(
            r#"{
                "Api": { "BaseUrl": "https://api.example.test/", "TimeoutSeconds": 30 },
                "AzureAd": { "TenantId": "x", "ClientId": "y", "Scopes": ["a"] }
            }"#,
        )
        .unwrap();
        assert_eq!(c.base_url, "https://api.example.test");
        assert_eq!(c.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_api_section_keeps_defaults() {
        let c = ClientConfig::from_settings_str(r#"{"Updates": {"FeedPath": "x"}}"#).unwrap();
        assert_eq!(c, ClientConfig::default());
    }

    #[test]
    fn settings_file_is_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Api": {{"BaseUrl": "http://10.0.0.5:8000"}}}}"#).unwrap();
        let c = ClientConfig::from_settings_file(file.path()).unwrap();
        assert_eq!(c.base_url, "http://10.0.0.5:8000");
    }

    #[test]
    fn unreadable_file_is_config_error() {
        let err = ClientConfig::from_settings_file("/nonexistent/appsettings.json").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn overrides_win_over_file() {
        let c = ClientConfig::new("http://file")
            .with_overrides(Some("http://env/".to_string()), Some("5".to_string()))
            .unwrap();
        assert_eq!(c.base_url, "http://env");
        assert_eq!(c.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_override_is_rejected() {
        let err = ClientConfig::default()
            .with_overrides(None, Some("soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
