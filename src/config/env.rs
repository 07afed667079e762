//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file from the current directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Load environment variables from an explicit file path
    ///
    /// Unlike the implicit .env lookup, a file named on the command line
    /// must exist.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        dotenv::from_path(path).map_err(|e| {
            AppError::config(format!(
                "Failed to load env file '{}': {}",
                path.display(),
                e
            ))
        })?;

        if debug {
            eprintln!("Loaded configuration from {}", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Voice Config Tester Configuration
#
# This file contains environment variables that can be used to configure
# the voice config tester. Values specified here will be used as defaults,
# but can be overridden by command-line arguments.

# Base URL of the management backend hosting the test endpoint
# CONFIG_TEST_BASE_URL=http://127.0.0.1:8080

# Bearer token sent with every test request
# CONFIG_TEST_TOKEN=change-me

# Timeout in seconds for single and draft tests (1-300)
# CONFIG_TEST_TIMEOUT_SECS=30

# Timeout in seconds for bulk tests (1-300)
# CONFIG_TEST_BULK_TIMEOUT_SECS=60

# Enable colored output (true/false)
# CONFIG_TEST_ENABLE_COLOR=true

# Example configurations for different scenarios:
#
# Testing a panel on another host:
# CONFIG_TEST_BASE_URL=http://10.0.0.2:8002
#
# Slow LLM providers that need more headroom:
# CONFIG_TEST_TIMEOUT_SECS=120
# CONFIG_TEST_BULK_TIMEOUT_SECS=300
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        use std::fs;

        let content = Self::create_example_env_content();
        fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "CONFIG_TEST_BASE_URL" => {
                let parsed = url::Url::parse(value).map_err(|e| {
                    AppError::config(format!("Invalid CONFIG_TEST_BASE_URL '{}': {}", value, e))
                })?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "CONFIG_TEST_BASE_URL must use http or https: {}",
                        value
                    )));
                }
            }
            "CONFIG_TEST_TOKEN" => {
                if value.trim().is_empty() {
                    return Err(AppError::config(
                        "CONFIG_TEST_TOKEN must not be blank".to_string(),
                    ));
                }
            }
            "CONFIG_TEST_TIMEOUT_SECS" | "CONFIG_TEST_BULK_TIMEOUT_SECS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid {} value '{}': {}", key, value, e))
                })?;
                if timeout == 0 || timeout > crate::defaults::MAX_TIMEOUT_SECS {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key,
                        crate::defaults::MAX_TIMEOUT_SECS,
                        timeout
                    )));
                }
            }
            "CONFIG_TEST_ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!(
                        "Invalid CONFIG_TEST_ENABLE_COLOR value '{}': {}",
                        value, e
                    ))
                })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (
                "CONFIG_TEST_BASE_URL",
                "Base URL of the management backend",
                "http://127.0.0.1:8080",
            ),
            (
                "CONFIG_TEST_TOKEN",
                "Bearer token for the test endpoint",
                "change-me",
            ),
            (
                "CONFIG_TEST_TIMEOUT_SECS",
                "Single/draft test timeout in seconds (1-300)",
                "30",
            ),
            (
                "CONFIG_TEST_BULK_TIMEOUT_SECS",
                "Bulk test timeout in seconds (1-300)",
                "60",
            ),
            (
                "CONFIG_TEST_ENABLE_COLOR",
                "Enable colored output",
                "true",
            ),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<30} {}\n", var, description));
            help.push_str(&format!("  {:<30} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        Ok(warnings)
    }

    /// Check if .env file exists and validate its contents
    pub fn check_env_file() -> Result<Option<Vec<String>>> {
        if !Path::new(".env").exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(".env")
            .map_err(|e| AppError::config(format!("Failed to read .env file: {}", e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                if let Err(e) = Self::validate_env_var(key, value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}
