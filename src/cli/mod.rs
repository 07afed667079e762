//! Command-line interface definitions and argument validation

use crate::types::{ConfigKind, TestMode};
use clap::Parser;
use std::path::PathBuf;

/// Voice Config Tester - exercise a panel's voice service configurations
/// through its test endpoint
#[derive(Parser, Debug, Clone)]
#[command(name = "vct")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration category to test (ota, vad, asr, llm, tts)
    #[arg(short = 't', long = "type", value_name = "CATEGORY", value_parser = parse_category)]
    pub category: ConfigKind,

    /// Test one saved configuration by its identifier
    #[arg(short = 'c', long = "config-id", value_name = "ID")]
    pub config_id: Option<String>,

    /// Test every saved configuration of the category
    #[arg(short = 'a', long, conflicts_with_all = ["config_id", "draft"])]
    pub all: bool,

    /// Test an unsaved draft payload read from a JSON file
    #[arg(short = 'd', long, value_name = "FILE", conflicts_with = "config_id")]
    pub draft: Option<PathBuf>,

    /// Base URL of the management backend
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token for the test endpoint
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Request timeout in seconds for the selected mode
    #[arg(long, value_parser = parse_duration, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Load environment variables from a specific file instead of .env
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(id) = &self.config_id {
            if id.trim().is_empty() {
                return Err("--config-id must not be blank".to_string());
            }
        }

        Ok(())
    }

    /// Derive the test mode from the mode flags
    ///
    /// Draft wins over bulk; the flag conflicts declared on the arguments
    /// keep contradictory combinations from parsing in the first place.
    pub fn to_mode(&self) -> TestMode {
        if let Some(source) = &self.draft {
            TestMode::Draft {
                source: source.clone(),
            }
        } else if self.all {
            TestMode::Bulk
        } else {
            TestMode::Single {
                config_id: self.config_id.clone(),
            }
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        summary.push_str(&format!("  Category: {}\n", self.category));
        summary.push_str(&format!("  Mode: {}\n", self.to_mode().name()));

        if let Some(ref id) = self.config_id {
            summary.push_str(&format!("  Config ID: {}\n", id));
        }

        if let Some(ref draft) = self.draft {
            summary.push_str(&format!("  Draft file: {}\n", draft.display()));
        }

        if let Some(ref base_url) = self.base_url {
            summary.push_str(&format!("  Base URL: {}\n", base_url));
        }

        if let Some(timeout) = self.timeout {
            summary.push_str(&format!("  Timeout: {}s\n", timeout));
        }

        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));
        summary.push_str(&format!("  JSON output: {}\n", self.json));

        summary
    }
}

/// Parse a category name into its kind
fn parse_category(s: &str) -> Result<ConfigKind, String> {
    s.parse::<ConfigKind>().map_err(|e| e.to_string())
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    // Reject strings with leading + sign or other invalid formats
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > crate::defaults::MAX_TIMEOUT_SECS {
                Err(format!(
                    "Duration cannot exceed {} seconds",
                    crate::defaults::MAX_TIMEOUT_SECS
                ))
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    // Check for common environment variables that indicate color support
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    // Check for NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for FORCE_COLOR environment variable
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // On Windows, check for ANSICON or ConEmu
    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
