//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// List view behavior
    #[serde(default)]
    pub list: ListConfig,

    /// Form behavior
    #[serde(default)]
    pub form: FormConfig,

    /// Client-side persisted state
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    ///
    /// A missing file is not an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.api.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation("api.base_url must be http or https"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.list.page_size == 0 {
            return Err(AppError::validation("list.page_size must be > 0"));
        }
        if self.list.page_size_options.iter().any(|&s| s == 0) {
            return Err(AppError::validation("list.page_size_options must be > 0"));
        }
        if !self.list.page_size_options.contains(&self.list.page_size) {
            return Err(AppError::validation(
                "list.page_size must be one of list.page_size_options",
            ));
        }
        if self.storage.theme_file.trim().is_empty() {
            return Err(AppError::validation("storage.theme_file is empty"));
        }
        Ok(())
    }

    /// Path of the theme preference file under the storage directory.
    pub fn theme_path(&self, storage_dir: &Path) -> PathBuf {
        storage_dir.join(&self.storage.theme_file)
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the backend; `/api/v1` is appended
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// List view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Rows per page on first load
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Selectable page sizes
    #[serde(default = "defaults::page_size_options")]
    pub page_size_options: Vec<u32>,

    /// Quiet period before a filter keystroke becomes a query
    #[serde(default = "defaults::filter_debounce")]
    pub filter_debounce_ms: u64,
}

impl ListConfig {
    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            page_size_options: defaults::page_size_options(),
            filter_debounce_ms: defaults::filter_debounce(),
        }
    }
}

/// Form settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Delay between a successful submit and navigation to the list
    #[serde(default = "defaults::redirect_delay")]
    pub redirect_delay_ms: u64,
}

impl FormConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: defaults::redirect_delay(),
        }
    }
}

/// Persisted client state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Theme preference file, relative to the storage directory
    #[serde(default = "defaults::theme_file")]
    pub theme_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            theme_file: defaults::theme_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `debug`, `info`, `warn`, `error`
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "http://localhost:8080".into()
    }
    pub fn user_agent() -> String {
        "roster/0.1 (admin client)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn page_size() -> u32 {
        10
    }
    pub fn page_size_options() -> Vec<u32> {
        vec![5, 10, 20, 50]
    }
    pub fn filter_debounce() -> u64 {
        400
    }

    pub fn redirect_delay() -> u64 {
        1500
    }

    pub fn theme_file() -> String {
        "theme.toml".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.api.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_page_size_outside_options() {
        let mut config = Config::default();
        config.list.page_size = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_base() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load_or_default(&path).list.page_size, 10);

        fs::write(&path, "[list\npage_size = ").unwrap();
        assert_eq!(Config::load_or_default(&path).list.page_size, 10);

        fs::write(&path, "[list]\npage_size = 25\n").unwrap();
        assert_eq!(Config::load_or_default(&path).list.page_size, 25);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://registrar.example.edu"

            [list]
            filter_debounce_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://registrar.example.edu");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.list.filter_debounce(), Duration::from_millis(250));
        assert_eq!(config.list.page_size, 10);
        assert_eq!(config.form.redirect_delay(), Duration::from_millis(1500));
    }
}
