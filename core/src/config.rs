//! Client and host configuration.
//!
//! `Configuration` is what a host stores (one per site); `ClientConfig` is
//! the immutable subset a client needs. Both normalize the API root so that
//! relative paths resolve beneath it.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default request timeout, in seconds.
pub const DEFAULT_CLIENT_TIMEOUT: u64 = 5;

/// Connection settings for a single client instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_root: String,
    api_token: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Build a config, appending a trailing slash to a non-empty root.
    ///
    /// An empty root is kept empty and yields a null client.
    pub fn new(api_root: &str, api_token: &str, timeout: Duration) -> Self {
        Self {
            api_root: normalize_api_root(api_root),
            api_token: api_token.to_string(),
            timeout,
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("", "", Duration::from_secs(DEFAULT_CLIENT_TIMEOUT))
    }
}

/// Host-level Open Forms settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Root URL of the Open Forms API, e.g. `https://forms.example.com/api/v2/`.
    pub api_root: String,
    pub api_token: String,
    /// Request timeout in seconds.
    pub client_timeout: u64,
    /// Open Forms SDK stylesheet URL.
    pub sdk_css_url: String,
    /// Open Forms SDK JavaScript URL.
    pub sdk_js_url: String,
    /// Forward the host's error-tracking settings to the SDK.
    pub use_sentry: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_root: String::new(),
            api_token: String::new(),
            client_timeout: DEFAULT_CLIENT_TIMEOUT,
            sdk_css_url: String::new(),
            sdk_js_url: String::new(),
            use_sentry: false,
        }
    }
}

impl Configuration {
    /// Parse, validate and normalize a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Configuration = toml::from_str(content)?;
        config.validated()
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Read `OFC_API_ROOT`, `OFC_API_TOKEN` and `OFC_CLIENT_TIMEOUT`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Configuration::default();
        if let Ok(root) = std::env::var("OFC_API_ROOT") {
            config.api_root = root;
        }
        if let Ok(token) = std::env::var("OFC_API_TOKEN") {
            config.api_token = token;
        }
        if let Ok(timeout) = std::env::var("OFC_CLIENT_TIMEOUT") {
            config.client_timeout = timeout.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("OFC_CLIENT_TIMEOUT is not an integer: {timeout:?}"))
            })?;
        }
        config.validated()
    }

    /// Check field constraints and normalize the API root.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.client_timeout == 0 {
            return Err(ConfigError::Invalid(
                "client_timeout must be a positive number of seconds".to_string(),
            ));
        }
        for (field, value) in [
            ("api_root", &self.api_root),
            ("sdk_css_url", &self.sdk_css_url),
            ("sdk_js_url", &self.sdk_js_url),
        ] {
            if !value.is_empty() {
                url::Url::parse(value)
                    .map_err(|e| ConfigError::Invalid(format!("{field}: {e}")))?;
            }
        }
        self.api_root = normalize_api_root(&self.api_root);
        Ok(self)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            &self.api_root,
            &self.api_token,
            Duration::from_secs(self.client_timeout),
        )
    }
}

fn normalize_api_root(api_root: &str) -> String {
    let root = api_root.trim();
    if root.is_empty() || root.ends_with('/') {
        root.to_string()
    } else {
        format!("{root}/")
    }
}
