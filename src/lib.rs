//! Voice Config Tester
//!
//! Normalizes results from the admin panel's configuration test endpoint.
//! The backend answers one endpoint with several shapes: a single result,
//! a map of results keyed by configuration identifier, or sentinel error
//! markers. This crate turns all of them into canonical pass/fail records
//! for the OTA, VAD, ASR, LLM, and TTS categories.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod output;
pub mod tester;
pub mod types;

// Re-export commonly used types
pub use client::{EndpointClient, TestTransport};
pub use error::{AppError, Result};
pub use models::{AggregatedResult, TesterConfig, TestRequest, TestResult};
pub use normalize::{coerce_payload, normalize_entry};
pub use output::{ColoredFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use tester::ConfigTester;
pub use types::{ConfigKind, TestMode};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values and protocol constants
pub mod defaults {
    use std::time::Duration;

    /// Fixed path of the backend's configuration test endpoint
    pub const TEST_ENDPOINT_PATH: &str = "/admin/configs/test";

    /// Base URL used when neither the environment nor the CLI supply one
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

    /// Budget for single and draft probes
    pub const SINGLE_TEST_TIMEOUT_SECS: u64 = 30;
    pub const SINGLE_TEST_TIMEOUT: Duration = Duration::from_secs(SINGLE_TEST_TIMEOUT_SECS);

    /// Budget for bulk probes, which fan out on the backend side
    pub const BULK_TEST_TIMEOUT_SECS: u64 = 60;
    pub const BULK_TEST_TIMEOUT: Duration = Duration::from_secs(BULK_TEST_TIMEOUT_SECS);

    /// Upper bound accepted for any timeout override
    pub const MAX_TIMEOUT_SECS: u64 = 300;

    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Key of the synthetic category-wide failure row in bulk results
    pub const GLOBAL_RESULT_KEY: &str = "_global";

    /// Fallback when the response carried no usable per-category payload
    pub const MSG_NO_RESULT_RETURNED: &str = "未返回测试结果";

    /// Fallback when a category produced no entries and no usable sentinel
    pub const MSG_NO_TEST_RESULT: &str = "无测试结果";

    /// Fallback when the category reports nothing is configured or enabled
    pub const MSG_NOT_CONFIGURED: &str = "未配置或未启用";

    /// User-Agent header sent with every probe
    pub const USER_AGENT: &str = concat!("voice-config-tester/", env!("CARGO_PKG_VERSION"));
}
