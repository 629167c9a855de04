use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_CONTENT_DIR: &str = "TERMINULL_CONTENT_DIR";
pub const ENV_SITE_URL: &str = "TERMINULL_SITE_URL";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Content root holding `issues/vol<N>/` article folders and `pages/`
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Public website, used for the "view at" links that replace media
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Display name for the local session; the login name when unset
    #[serde(default)]
    pub user: Option<String>,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("../src/content")
}

fn default_site_url() -> String {
    "https://terminull.local".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            site_url: default_site_url(),
            user: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Pretty JSON, as written by `--dump-config`
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Override fields from `TERMINULL_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Same as [`Config::apply_env`] with a custom lookup. Empty values are
    /// ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_CONTENT_DIR).filter(|v| !v.is_empty()) {
            self.content_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(ENV_SITE_URL).filter(|v| !v.is_empty()) {
            self.site_url = url;
        }
    }

    /// Check the configuration and normalize the site URL (no trailing
    /// slash, so article links never contain `//vol`)
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.content_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "content_dir cannot be empty".to_string(),
            ));
        }

        let trimmed = self.site_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://"))
            || trimmed.ends_with("://")
        {
            return Err(ConfigError::ValidationError(format!(
                "site_url must be an http(s) URL, got {:?}",
                self.site_url
            )));
        }
        self.site_url = trimmed.to_string();

        if let Some(user) = &self.user {
            if user.trim().is_empty() {
                self.user = None;
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
