use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable holding the scraping API's base address.
pub const API_BASE_ENV: &str = "PAGESCOPE_API_BASE_URL";
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/pagescope/config.json";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base address of the scraping API, without trailing slash.
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 60,
            user_agent: format!("pagescope/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validated()
    }

    /// Resolves the effective configuration. Precedence, highest first:
    /// `cli_base`, the `PAGESCOPE_API_BASE_URL` variable, the config file,
    /// built-in defaults.
    pub fn resolve(cli_base: Option<&str>, config_path: Option<&str>) -> Result<Self> {
        let env_base = std::env::var(API_BASE_ENV).ok();
        Self::resolve_from(cli_base, env_base.as_deref(), config_path)
    }

    /// Same as [`Config::resolve`] with the environment value passed in.
    pub fn resolve_from(
        cli_base: Option<&str>,
        env_base: Option<&str>,
        config_path: Option<&str>,
    ) -> Result<Self> {
        let path = expand_path(config_path.unwrap_or(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            debug!("Loading config from {}", path.display());
            Self::from_file(&path)?
        } else if config_path.is_some() {
            // An explicitly named file has to exist.
            return Err(ConfigError::Io {
                path,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        } else {
            Self::default()
        };

        if let Some(base) = env_base.filter(|b| !b.trim().is_empty()) {
            config.api_base_url = base.trim().to_string();
        }
        if let Some(base) = cli_base {
            config.api_base_url = base.trim().to_string();
        }

        config.validated()
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self> {
        self.api_base_url = base.to_string();
        self.validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.api_base_url = normalize_base_url(&self.api_base_url)?;
        Ok(self)
    }
}

/// Expands a leading `~` in `path`.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.query().is_some() {
        return Err(invalid("query strings are not allowed".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
