//! Configuration for the Smartsheet row store
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SMARTSHEET_API_BASE: &str = "https://api.smartsheet.com/2.0";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading or validating configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ConfigError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Connection settings for the Smartsheet REST API
#[derive(Clone)]
pub struct SmartsheetConfig {
    /// API root, without a trailing slash
    pub base_url: String,

    /// Bearer token used for every request
    pub access_token: String,

    /// Per-request timeout applied by the HTTP client
    pub request_timeout: Duration,
}

impl Default for SmartsheetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SMARTSHEET_API_BASE.to_string(),
            access_token: String::new(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SmartsheetConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    /// Read `SMARTSHEET_API_BASE`, `SMARTSHEET_ACCESS_TOKEN` and
    /// `SMARTSHEET_TIMEOUT_SECS`, falling back to defaults, then validate
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("SMARTSHEET_API_BASE") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(token) = lookup("SMARTSHEET_ACCESS_TOKEN") {
            config.access_token = token.trim().to_string();
        }
        if let Some(timeout) = lookup("SMARTSHEET_TIMEOUT_SECS") {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                ConfigError::invalid("SMARTSHEET_TIMEOUT_SECS", "must be a whole number of seconds")
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.is_empty() {
            return Err(ConfigError::Missing("SMARTSHEET_ACCESS_TOKEN".to_string()));
        }

        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::invalid(
                "SMARTSHEET_API_BASE",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "SMARTSHEET_TIMEOUT_SECS",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for SmartsheetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartsheetConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
