//! Persisted settings of the lead desk.
//!
//! Stored as TOML in the user's config directory. Values given on the
//! command line (or through `LEAD_DESK_API_URL`) override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lead_admin::ListConfig;
use lead_client::{ApiError, ClientConfig};

/// API base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SettingsError {
    /// Returns a user-friendly message.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Read { .. } => "Não foi possível ler o arquivo de configuração.",
            Self::Parse { .. } => "O arquivo de configuração é inválido.",
            Self::Serialize(_) | Self::Write { .. } => {
                "Não foi possível salvar o arquivo de configuração."
            }
        }
    }
}

/// Settings file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the lead API.
    pub api_url: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Dashboard rows per page.
    pub page_size: usize,

    /// Append analytics records to this JSON lines file. Logged when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_log: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: lead_client::DEFAULT_TIMEOUT.as_secs(),
            page_size: lead_admin::DEFAULT_PAGE_SIZE,
            analytics_log: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub page_size: Option<usize>,
    pub analytics_log: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_error = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(write_error)
    }

    /// File contents for these settings.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "LeadDesk", "lead-desk")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Apply command-line values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(page_size) = overrides.page_size {
            self.page_size = page_size;
        }
        if overrides.analytics_log.is_some() {
            self.analytics_log = overrides.analytics_log;
        }
        self
    }

    pub fn client_config(&self) -> Result<ClientConfig, ApiError> {
        Ok(ClientConfig::new(&self.api_url)?
            .with_timeout(Duration::from_secs(self.request_timeout_secs.max(1))))
    }

    pub fn list_config(&self) -> ListConfig {
        ListConfig {
            page_size: self.page_size.max(1),
            ..ListConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "api_url = \"https://leads.example.com/api\"\npage_size = 25\n")
            .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.api_url, "https://leads.example.com/api");
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "page_size = \"many\"").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.toml");
        let settings = Settings {
            analytics_log: Some(PathBuf::from("/tmp/analytics.jsonl")),
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn overrides_win() {
        let settings = Settings::default().with_overrides(Overrides {
            api_url: Some("https://other.example.com".to_string()),
            page_size: Some(50),
            ..Overrides::default()
        });
        assert_eq!(settings.api_url, "https://other.example.com");
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.request_timeout_secs, 30);

        let config = settings.client_config().unwrap();
        assert_eq!(config.base_url().as_str(), "https://other.example.com/");
        assert_eq!(settings.list_config().page_size, 50);
    }

    #[test]
    fn bad_url_is_rejected() {
        let settings = Settings::default().with_overrides(Overrides {
            api_url: Some("not a url".to_string()),
            ..Overrides::default()
        });
        assert!(matches!(
            settings.client_config(),
            Err(ApiError::InvalidConfig(_))
        ));
    }
}
