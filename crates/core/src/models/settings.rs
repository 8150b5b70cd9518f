use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::portfolio::{DEFAULT_MAX_DAYS, DEFAULT_STARTING_CASH};

/// Environment variable overriding `api_base_url`.
pub const ENV_API_URL: &str = "FINPLAY_API_URL";
/// Environment variable overriding `api_token`.
pub const ENV_API_TOKEN: &str = "FINPLAY_API_TOKEN";
/// Environment variable overriding `autosave_debounce_ms`.
pub const ENV_AUTOSAVE_MS: &str = "FINPLAY_AUTOSAVE_MS";

/// What a read does when the API call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Serve the last locally known data, or the default when there is none
    #[default]
    ServeCache,
    /// Serve the built-in default (empty list or static content)
    ServeDefault,
    /// Return the error to the caller
    Propagate,
}

/// Client configuration, stored inside the student data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the learning platform API, without trailing slash
    pub api_base_url: String,

    /// Bearer token for the API
    pub api_token: Option<String>,

    pub request_timeout_secs: u64,

    /// Delay between the last edit and the autosave write
    pub autosave_debounce_ms: u64,

    pub read_policy: ReadPolicy,

    /// Cash a fresh simulator portfolio starts with
    pub starting_cash: f64,

    /// Length of the investment simulation in days
    pub max_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            api_token: None,
            request_timeout_secs: 30,
            autosave_debounce_ms: 1_500,
            read_policy: ReadPolicy::default(),
            starting_cash: DEFAULT_STARTING_CASH,
            max_days: DEFAULT_MAX_DAYS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `FINPLAY_*` environment overrides on top of these settings.
    pub fn with_env_overrides(self) -> Result<Self, CoreError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment, CLI flags, tests).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = if token.is_empty() { None } else { Some(token) };
        }
        if let Some(ms) = lookup(ENV_AUTOSAVE_MS) {
            self.autosave_debounce_ms = ms.trim().parse().map_err(|_| {
                CoreError::ValidationError(format!("{ENV_AUTOSAVE_MS} must be an integer, got '{ms}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(CoreError::ValidationError(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::ValidationError("Request timeout must be at least 1 second".into()));
        }
        if !self.starting_cash.is_finite() || self.starting_cash < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Starting cash must be a non-negative number, got {}",
                self.starting_cash
            )));
        }
        if self.max_days < 2 {
            return Err(CoreError::ValidationError(format!(
                "Simulation needs at least 2 days, got {}",
                self.max_days
            )));
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
