//! Configuration for the Coles MCP server
//!
//! Everything has a built-in default so the server runs without a config file.
//! A TOML file can override the upstream build id, locale, headers, cookie and
//! timeout; the build id and cookie rotate on the upstream side and are the
//! values most likely to need overriding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upstream site origin
pub const DEFAULT_ORIGIN: &str = "https://www.coles.com.au";

/// Next.js build id embedded in the `_next/data` path
pub const DEFAULT_BUILD_ID: &str = "20250910.2-94eac02bf9675b685ea17b771023fada9319d0f3";

pub const DEFAULT_LOCALE: &str = "en";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

/// Config files tried when no `--config` is given, in order
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["coles-mcp.toml", "config/coles-mcp.toml"];

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Identity advertised to the MCP host during `initialize`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Server name reported in `serverInfo`
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Optional usage hints returned to the host
    pub instructions: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            instructions: Some(default_instructions()),
        }
    }
}

fn default_server_name() -> String {
    "coles".to_string()
}

fn default_instructions() -> String {
    "Search Coles products with fetch_product_data, build a slug from a search hit with \
     create_product_slug, then pass it to fetch_product_details for nutrition and ingredients."
        .to_string()
}

/// Upstream API client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Scheme and host of the upstream site
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Next.js build id
    #[serde(default = "default_build_id")]
    pub build_id: String,
    /// Locale path segment
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Per-request timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Literal cookie header value
    pub cookie: Option<String>,
    /// Environment variable holding the cookie header value (wins over `cookie`)
    pub cookie_env: Option<String>,
    /// Static headers sent with every request
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            build_id: default_build_id(),
            locale: default_locale(),
            timeout_ms: default_timeout_ms(),
            cookie: None,
            cookie_env: None,
            headers: default_headers(),
        }
    }
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_build_id() -> String {
    DEFAULT_BUILD_ID.to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
        ("sec-ch-ua-mobile".to_string(), "?0".to_string()),
        ("dnt".to_string(), "1".to_string()),
        ("sec-gpc".to_string(), "1".to_string()),
    ])
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to render TOML: {0}")]
    TomlRender(#[from] toml::ser::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit path if given, else the first default path that
    /// exists, else the built-in defaults
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load_from_file(path)?, Some(path.to_path_buf())));
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = PathBuf::from(candidate);
            if path.exists() {
                let config = Self::load_from_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "server.name must not be empty".to_string(),
            ));
        }
        self.api.validate()
    }

    /// Copy safe to print: the cookie and any `Cookie` header are masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api.cookie.is_some() {
            copy.api.cookie = Some("***".to_string());
        }
        for (name, value) in copy.api.headers.iter_mut() {
            if name.eq_ignore_ascii_case("cookie") {
                *value = "***".to_string();
            }
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl ApiConfig {
    /// Base of every data endpoint: `{origin}/_next/data/{build_id}/{locale}`
    pub fn data_base_url(&self) -> String {
        format!(
            "{}/_next/data/{}/{}",
            self.origin.trim_end_matches('/'),
            self.build_id.trim_matches('/'),
            self.locale.trim_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve the cookie header value, preferring `cookie_env`
    pub fn resolve_cookie(&self) -> Result<Option<String>, ConfigError> {
        match &self.cookie_env {
            Some(name) => std::env::var(name)
                .map(Some)
                .map_err(|_| ConfigError::EnvVarNotFound(name.clone())),
            None => Ok(self.cookie.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("api.origin", &self.origin),
            ("api.build_id", &self.build_id),
            ("api.locale", &self.locale),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(format!(
                    "{field} must not be empty"
                )));
            }
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "api.timeout_ms must be greater than zero".to_string(),
            ));
        }

        let origin = Url::parse(&self.origin).map_err(|e| {
            ConfigError::InvalidConfig(format!("api.origin '{}' is not a URL: {e}", self.origin))
        })?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidConfig(format!(
                "api.origin must use http or https, got '{}'",
                origin.scheme()
            )));
        }

        Ok(())
    }
}
