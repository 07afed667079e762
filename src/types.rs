//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Configuration categories the backend can test
///
/// The wire names are lowercase and fixed; the backend indexes its response
/// payload by these same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    /// Firmware update endpoint
    Ota,
    /// Voice activity detection
    Vad,
    /// Speech recognition
    Asr,
    /// Large language model
    Llm,
    /// Speech synthesis
    Tts,
}

impl ConfigKind {
    /// All categories, in the panel's display order
    pub const ALL: [ConfigKind; 5] = [
        ConfigKind::Ota,
        ConfigKind::Vad,
        ConfigKind::Asr,
        ConfigKind::Llm,
        ConfigKind::Tts,
    ];

    /// The wire name used in request bodies and response payload keys
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::Ota => "ota",
            ConfigKind::Vad => "vad",
            ConfigKind::Asr => "asr",
            ConfigKind::Llm => "llm",
            ConfigKind::Tts => "tts",
        }
    }

    /// Get the panel's display label for this category
    pub fn label(&self) -> &'static str {
        match self {
            ConfigKind::Ota => "固件升级",
            ConfigKind::Vad => "语音活动检测",
            ConfigKind::Asr => "语音识别",
            ConfigKind::Llm => "大语言模型",
            ConfigKind::Tts => "语音合成",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ota" => Ok(ConfigKind::Ota),
            "vad" => Ok(ConfigKind::Vad),
            "asr" => Ok(ConfigKind::Asr),
            "llm" => Ok(ConfigKind::Llm),
            "tts" => Ok(ConfigKind::Tts),
            other => Err(AppError::validation(format!(
                "unknown configuration category '{}' (expected one of: ota, vad, asr, llm, tts)",
                other
            ))),
        }
    }
}

/// How a run selects what to test
#[derive(Debug, Clone, PartialEq)]
pub enum TestMode {
    /// One configuration, or the first available one when no id is given
    Single { config_id: Option<String> },
    /// Every saved configuration of the category
    Bulk,
    /// An unsaved payload read from a file
    Draft { source: PathBuf },
}

impl TestMode {
    /// Short name for logging and summaries
    pub fn name(&self) -> &'static str {
        match self {
            TestMode::Single { .. } => "single",
            TestMode::Bulk => "bulk",
            TestMode::Draft { .. } => "draft",
        }
    }
}
