//! Runtime settings
//!
//! Read from a TOML file, then overridden by CLI flags and environment
//! variables in the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// File looked up in the working directory when no path is given
pub const DEFAULT_SETTINGS_FILE: &str = "clusterforge.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
}

/// Hosted backend connection and table names
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// REST endpoint root, e.g. `https://project.example.com/rest/v1`
    pub url: String,

    /// Sent as both `apikey` and bearer token
    pub api_key: Option<String>,

    pub timeout_secs: u64,

    pub templates_table: String,
    pub credentials_table: String,
    pub managers_table: String,
    pub manager_credentials_table: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            timeout_secs: 30,
            templates_table: "cluster_templates".to_string(),
            credentials_table: "cloud_credentials".to_string(),
            managers_table: "manager_servers".to_string(),
            manager_credentials_table: "manager_credentials".to_string(),
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Load from `path`, else from [`DEFAULT_SETTINGS_FILE`] if present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
                if !fallback.exists() {
                    debug!("no settings file found, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };
        debug!(path = %path.display(), "loading settings");
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        let backend = &self.backend;
        if backend.url.trim().is_empty() {
            return Err(Error::ConfigError(
                "backend.url must be set (or pass --backend-url)".to_string(),
            ));
        }
        let parsed = url::Url::parse(&backend.url)
            .map_err(|e| Error::ConfigError(format!("backend.url '{}': {e}", backend.url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::ConfigError(format!(
                "backend.url must be http(s), got '{}'",
                parsed.scheme()
            )));
        }
        if backend.timeout_secs == 0 {
            return Err(Error::ConfigError(
                "backend.timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (key, table) in [
            ("templates_table", &backend.templates_table),
            ("credentials_table", &backend.credentials_table),
            ("managers_table", &backend.managers_table),
            ("manager_credentials_table", &backend.manager_credentials_table),
        ] {
            if table.trim().is_empty() {
                return Err(Error::ConfigError(format!("backend.{key} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.backend.timeout_secs, 30);
        assert_eq!(settings.backend.templates_table, "cluster_templates");
        assert_eq!(settings.backend.credentials_table, "cloud_credentials");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [backend]
            url = "https://db.example.com/rest/v1"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(settings.backend.timeout(), Duration::from_secs(5));
        assert_eq!(settings.backend.managers_table, "manager_servers");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nurl = \"http://localhost:3000\"\napi_key = \"anon\"\ntemplates_table = \"tpl\""
        )
        .unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.backend.api_key.as_deref(), Some("anon"));
        assert_eq!(settings.backend.templates_table, "tpl");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Settings::from_toml("[backend\nurl=").unwrap_err();
        assert!(matches!(err, Error::TomlError(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.backend.url = "ftp://files.example.com".to_string();
        assert!(settings.validate().is_err());

        settings.backend.url = "https://db.example.com".to_string();
        settings.backend.timeout_secs = 0;
        assert!(settings.validate().is_err());

        settings.backend.timeout_secs = 10;
        settings.backend.templates_table = " ".to_string();
        assert!(settings.validate().is_err());
    }
}
