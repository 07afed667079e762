//! Data models and structures for the configuration test tool

pub mod config;
pub mod request;
pub mod result;

// Re-export main model types
pub use config::TesterConfig;
pub use request::TestRequest;
pub use result::{AggregatedResult, TestResult};
