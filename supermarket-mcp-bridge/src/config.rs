//! Bridge configuration.
//!
//! Two sources feed the bridge:
//!
//! - [`BridgeConfig`]: static settings (endpoints, header names, default
//!   store, timeouts). Built-in defaults target the live retailer sites; a
//!   TOML file can override any of them.
//! - [`ConfigProvider`]: secrets looked up by name at call time. The process
//!   uses [`EnvProvider`]; tests use [`StaticProvider`].
//!
//! # Examples
//!
//! ```
//! use supermarket_mcp_bridge::config::BridgeConfig;
//!
//! let config = BridgeConfig::from_toml(r#"
//!     [coles]
//!     default_store_id = "7674"
//!
//!     [http]
//!     timeout_secs = 20
//! "#).unwrap();
//!
//! assert_eq!(config.coles.default_store_id.as_deref(), Some("7674"));
//! assert_eq!(config.woolworths.base_url, "https://www.woolworths.com.au");
//! ```

use std::{collections::HashMap, fmt, path::Path};

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::{
    error::{BridgeError, Result},
    transport::HttpConfig,
};

/// Store searched when a Coles call does not name one.
pub const DEFAULT_COLES_STORE_ID: &str = "0584";

/// Desktop browser identity sent to Woolworths, which rejects unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Outbound HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Coles adapter settings.
    #[serde(default)]
    pub coles: ColesConfig,

    /// Woolworths adapter settings.
    #[serde(default)]
    pub woolworths: WoolworthsConfig,
}

impl BridgeConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if parsing or validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| BridgeError::ConfigError(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if the file cannot be read or is
    /// invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::ConfigError(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;
        self.coles.validate()?;
        self.woolworths.validate()
    }
}

/// Coles product-search settings, the `[coles]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColesConfig {
    /// Site root; the search path is appended to it.
    #[serde(default = "default_coles_base_url")]
    pub base_url: String,

    /// Name of the variable holding the subscription key.
    #[serde(default = "default_coles_api_key_env")]
    pub api_key_env: String,

    /// Header carrying the subscription key.
    #[serde(default = "default_coles_api_key_header")]
    pub api_key_header: String,

    /// Store applied when a call gives none. An empty string disables the
    /// store filter.
    #[serde(default = "default_coles_store_id", deserialize_with = "non_empty")]
    pub default_store_id: Option<String>,
}

impl Default for ColesConfig {
    fn default() -> Self {
        Self {
            base_url: default_coles_base_url(),
            api_key_env: default_coles_api_key_env(),
            api_key_header: default_coles_api_key_header(),
            default_store_id: default_coles_store_id(),
        }
    }
}

impl ColesConfig {
    /// Validates the Coles section.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] for a non-HTTPS or loopback base
    /// URL, a malformed variable name or a malformed header name.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("coles.base_url", &self.base_url)?;
        validate_env_var_name(&self.api_key_env)?;
        validate_header_name(&self.api_key_header)
    }
}

/// Woolworths product-search settings, the `[woolworths]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WoolworthsConfig {
    /// Site root; the search path is appended to it.
    #[serde(default = "default_woolworths_base_url")]
    pub base_url: String,

    /// `User-Agent` header sent with every search.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WoolworthsConfig {
    fn default() -> Self {
        Self { base_url: default_woolworths_base_url(), user_agent: default_user_agent() }
    }
}

impl WoolworthsConfig {
    /// Validates the Woolworths section.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] for a non-HTTPS or loopback base
    /// URL or an empty user agent.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("woolworths.base_url", &self.base_url)?;
        if self.user_agent.trim().is_empty() {
            return Err(BridgeError::ConfigError(
                "woolworths.user_agent cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_coles_base_url() -> String {
    "https://www.coles.com.au".to_owned()
}

fn default_coles_api_key_env() -> String {
    "COLES_API_KEY".to_owned()
}

fn default_coles_api_key_header() -> String {
    "Ocp-Apim-Subscription-Key".to_owned()
}

#[allow(
    clippy::unnecessary_wraps,
    reason = "serde default must match the Option field type"
)]
fn default_coles_store_id() -> Option<String> {
    Some(DEFAULT_COLES_STORE_ID.to_owned())
}

fn default_woolworths_base_url() -> String {
    "https://www.woolworths.com.au".to_owned()
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_owned()
}

fn non_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()))
}

/// Validates a retailer base URL: HTTPS, not loopback.
fn validate_base_url(field: &str, base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)
        .map_err(|e| BridgeError::ConfigError(format!("invalid {field} '{base_url}': {e}")))?;

    if url.scheme() != "https" {
        return Err(BridgeError::ConfigError(format!(
            "{field} must use HTTPS, got: {}",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str() {
        let host_lower = host.to_lowercase();
        if host_lower == "localhost"
            || host_lower.starts_with("127.")
            || host_lower == "::1"
            || host_lower == "[::1]"
        {
            return Err(BridgeError::ConfigError(format!(
                "{field} must not be localhost or loopback: {host}"
            )));
        }
    }

    Ok(())
}

/// Validates an environment variable name.
fn validate_env_var_name(name: &str) -> Result<()> {
    let Some(first_char) = name.chars().next() else {
        return Err(BridgeError::ConfigError(
            "environment variable name cannot be empty".to_owned(),
        ));
    };

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(BridgeError::ConfigError(format!(
            "environment variable name must start with letter or underscore: {name}"
        )));
    }

    if let Some(ch) = name.chars().find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(BridgeError::ConfigError(format!(
            "environment variable name contains invalid character '{ch}': {name}"
        )));
    }

    Ok(())
}

/// Validates an HTTP header name.
fn validate_header_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BridgeError::ConfigError("header name cannot be empty".to_owned()));
    }

    if let Some(ch) = name.chars().find(|ch| !ch.is_ascii_alphanumeric() && !"-_".contains(*ch)) {
        return Err(BridgeError::ConfigError(format!(
            "header name contains invalid character '{ch}': {name}"
        )));
    }

    Ok(())
}

/// Source of secrets resolved at call time.
///
/// Implementations return `None` for absent or empty values.
pub trait ConfigProvider: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProvider;

impl ConfigProvider for EnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.trim().is_empty())
    }
}

/// Fixed set of secrets, for tests and embedding.
#[derive(Clone, Default)]
pub struct StaticProvider {
    values: HashMap<String, String>,
}

impl StaticProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for StaticProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys only; values are credentials.
        f.debug_struct("StaticProvider").field("keys", &self.values.keys()).finish()
    }
}

impl ConfigProvider for StaticProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|value| !value.trim().is_empty()).cloned()
    }
}
