//! Runtime configuration data model and validation

use crate::types::{AppError, Result, TestMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TesterConfig {
    /// Base URL of the management backend hosting the test endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Admin bearer token, sent as an Authorization header when set
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Timeout budget for single and draft tests
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Timeout budget for bulk tests, which touch every configuration
    #[serde(default = "default_bulk_timeout_secs")]
    pub bulk_timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Emit raw JSON results instead of a rendered table
    #[serde(default)]
    pub json_output: bool,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            timeout_seconds: default_timeout_secs(),
            bulk_timeout_seconds: default_bulk_timeout_secs(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            json_output: false,
        }
    }
}

impl TesterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the single/draft timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Get the bulk timeout as a Duration
    pub fn bulk_timeout(&self) -> Duration {
        Duration::from_secs(self.bulk_timeout_seconds)
    }

    /// Pick the timeout budget for a test mode
    pub fn budget_for(&self, mode: &TestMode) -> Duration {
        match mode {
            TestMode::Bulk => self.bulk_timeout(),
            TestMode::Single { .. } | TestMode::Draft { .. } => self.timeout(),
        }
    }

    /// Full URL of the test endpoint under the configured base
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            crate::defaults::TEST_ENDPOINT_PATH
        )
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AppError::config("Base URL cannot be empty"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "Base URL must use http or https: {}",
                        self.base_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid base URL '{}': {}",
                    self.base_url, e
                )));
            }
        }

        if let Some(token) = &self.auth_token {
            if token.trim().is_empty() {
                return Err(AppError::config("Auth token cannot be blank"));
            }
        }

        if self.timeout_seconds == 0 || self.bulk_timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > crate::defaults::MAX_TIMEOUT_SECS
            || self.bulk_timeout_seconds > crate::defaults::MAX_TIMEOUT_SECS
        {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("CONFIG_TEST_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }

        if let Ok(token) = std::env::var("CONFIG_TEST_TOKEN") {
            if !token.trim().is_empty() {
                self.auth_token = Some(token.trim().to_string());
            }
        }

        if let Ok(timeout) = std::env::var("CONFIG_TEST_TIMEOUT_SECS") {
            self.timeout_seconds = timeout.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid CONFIG_TEST_TIMEOUT_SECS value '{}': {}",
                    timeout, e
                ))
            })?;
        }

        if let Ok(timeout) = std::env::var("CONFIG_TEST_BULK_TIMEOUT_SECS") {
            self.bulk_timeout_seconds = timeout.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid CONFIG_TEST_BULK_TIMEOUT_SECS value '{}': {}",
                    timeout, e
                ))
            })?;
        }

        if let Ok(enable_color) = std::env::var("CONFIG_TEST_ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid CONFIG_TEST_ENABLE_COLOR value '{}': {}",
                    enable_color, e
                ))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    crate::defaults::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::defaults::SINGLE_TEST_TIMEOUT.as_secs()
}

fn default_bulk_timeout_secs() -> u64 {
    crate::defaults::BULK_TEST_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
