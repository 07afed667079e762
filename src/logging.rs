//! Structured logging for the configuration tester
//!
//! Provides leveled, structured log entries with optional JSON output and
//! per-probe correlation IDs. All log output goes to stderr; stdout is
//! reserved for test results.

use crate::error::{AppError, Result};
use crate::models::TesterConfig;
use crate::types::ConfigKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Session ID injected into every entry
    session_id: Option<String>,
}

impl Logger {
    /// Create a new logger with default settings
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name,
            session_id: None,
        }
    }

    /// Create a logger with level, format, and color derived from
    /// runtime configuration
    pub fn with_config(name: String, config: &TesterConfig) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug {
                LogFormat::Json
            } else {
                LogFormat::Console
            },
            name,
            session_id: None,
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Enable or disable colored output
    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Set session correlation ID
    pub fn set_session_id(&mut self, session_id: String) {
        self.session_id = Some(session_id);
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn trace(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write log entry to stderr
    fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        if let Some(session_id) = &self.session_id {
            entry.fields.insert(
                "session_id".to_string(),
                serde_json::Value::String(session_id.clone()),
            );
        }

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!(
                "{}{:>5}{}",
                entry.level.color_code(),
                level_str,
                LogLevel::reset_code()
            )
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!(
            "{} {} [{}] {}",
            timestamp, formatted_level, entry.logger, entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            // Show first 8 chars
            let short = correlation_id.get(..8).unwrap_or(correlation_id);
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!(
                "{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}",
                entry.message
            ),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!(
            "{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Correlation context for one probe against the endpoint
#[derive(Debug, Clone)]
pub struct ProbeContext {
    correlation_id: String,
    kind: ConfigKind,
    mode: String,
}

impl ProbeContext {
    /// The probe's correlation ID
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

/// Specialized logger for endpoint probes
///
/// Wraps the structured logger with the events the tester emits: probe
/// dispatch, completion, failure, and payload anomalies. The quiet
/// default only surfaces warnings.
#[derive(Debug, Clone)]
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    /// Create a new probe logger
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Create a probe logger from runtime configuration
    pub fn from_config(config: &TesterConfig) -> Self {
        Self::new(Logger::with_config("PROBE".to_string(), config))
    }

    /// Log probe dispatch and open a correlation context
    pub fn start(&self, kind: ConfigKind, mode: &str, timeout: Duration) -> ProbeContext {
        let context = ProbeContext {
            correlation_id: Uuid::new_v4().to_string(),
            kind,
            mode: mode.to_string(),
        };

        self.logger
            .debug(&format!("Dispatching {} test for {}", mode, kind))
            .correlation_id(&context.correlation_id)
            .field("category", kind.as_str())
            .field("mode", mode)
            .field("timeout_ms", timeout.as_millis() as u64)
            .log();

        context
    }

    /// Log a probe that settled with a response body
    pub fn completed(&self, context: &ProbeContext, elapsed: Duration) {
        self.logger
            .debug(&format!(
                "{} test for {} responded in {:.1}ms",
                context.mode,
                context.kind,
                elapsed.as_secs_f64() * 1000.0
            ))
            .correlation_id(&context.correlation_id)
            .field("category", context.kind.as_str())
            .field("mode", &context.mode)
            .field("elapsed_ms", elapsed.as_secs_f64() * 1000.0)
            .log();
    }

    /// Log a probe that failed in transport
    pub fn failed(&self, context: &ProbeContext, elapsed: Duration, error: &AppError) {
        self.logger
            .warn(&format!(
                "{} test for {} failed after {:.1}ms: {}",
                context.mode,
                context.kind,
                elapsed.as_secs_f64() * 1000.0,
                error
            ))
            .correlation_id(&context.correlation_id)
            .field("category", context.kind.as_str())
            .field("mode", &context.mode)
            .field("elapsed_ms", elapsed.as_secs_f64() * 1000.0)
            .error_info(error)
            .log();
    }

    /// Log a response that carried no usable payload for the category
    pub fn payload_missing(&self, context: &ProbeContext) {
        self.logger
            .debug(&format!(
                "Response carried no usable {} payload",
                context.kind
            ))
            .correlation_id(&context.correlation_id)
            .field("category", context.kind.as_str())
            .field("mode", &context.mode)
            .log();
    }

    /// Log a draft payload that was silently coerced away
    pub fn payload_discarded(&self, detail: &str) {
        self.logger
            .debug(&format!("Draft payload discarded: {}", detail))
            .field("reason", detail)
            .log();
    }
}

impl Default for ProbeLogger {
    fn default() -> Self {
        Self::new(Logger::new("PROBE".to_string()))
    }
}

/// Global logger factory and session management
pub struct LoggerFactory {
    config: TesterConfig,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory with a fresh session ID
    pub fn new(config: TesterConfig) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub fn create_logger(&self, name: &str) -> Logger {
        let mut logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone());
        logger
    }

    /// Create a probe logger
    pub fn create_probe_logger(&self) -> ProbeLogger {
        ProbeLogger::new(self.create_logger("PROBE"))
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_level_strings() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Warn.as_str(), "WARN");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_logger_creation() {
        let logger = Logger::new("TEST".to_string());
        assert_eq!(logger.name, "TEST");
        assert_eq!(logger.min_level, LogLevel::Info);
        assert!(logger.use_color);
    }

    #[test]
    fn test_logger_with_config() {
        let config = TesterConfig {
            debug: true,
            verbose: true,
            enable_color: false,
            ..Default::default()
        };

        let logger = Logger::with_config("TEST".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);
        assert!(!logger.use_color);
    }

    #[test]
    fn test_quiet_default_level() {
        let config = TesterConfig::default();
        let logger = Logger::with_config("TEST".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Warn);

        let verbose = TesterConfig {
            verbose: true,
            ..Default::default()
        };
        let logger = Logger::with_config("TEST".to_string(), &verbose);
        assert_eq!(logger.min_level, LogLevel::Info);
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Error));
    }

    #[test]
    fn test_log_entry_builder() {
        let logger = Logger::new("TEST".to_string());

        // The builder pattern must work without panicking.
        logger
            .info("test message")
            .correlation_id("test-id")
            .field("test_field", "test_value")
            .log();
    }

    #[test]
    fn test_log_formats() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test message".to_string(),
            logger: "TEST".to_string(),
            correlation_id: Some("abcdef12-3456".to_string()),
            fields: {
                let mut map = HashMap::new();
                map.insert(
                    "key".to_string(),
                    serde_json::Value::String("value".to_string()),
                );
                map
            },
        };

        let logger = Logger::new("TEST".to_string());

        let console_output = logger.format_console(&entry);
        assert!(console_output.contains("INFO"));
        assert!(console_output.contains("Test message"));
        assert!(console_output.contains("abcdef12"));

        let json_output = logger.format_json(&entry);
        assert!(json_output.starts_with('{'));
        assert!(json_output.ends_with('}'));

        let compact_output = logger.format_compact(&entry);
        assert!(compact_output.contains('I'));
        assert!(compact_output.contains("Test message"));
    }

    #[test]
    fn test_probe_lifecycle_logging() {
        let probe_logger = ProbeLogger::default();

        let context = probe_logger.start(ConfigKind::Llm, "single", Duration::from_secs(30));
        assert!(!context.correlation_id().is_empty());

        probe_logger.completed(&context, Duration::from_millis(42));
        probe_logger.payload_missing(&context);
        probe_logger.failed(
            &context,
            Duration::from_millis(42),
            &AppError::network("connection reset"),
        );
        probe_logger.payload_discarded("draft file was not a JSON object");
    }

    #[test]
    fn test_logger_factory() {
        let config = TesterConfig::default();
        let factory = LoggerFactory::new(config);

        let logger = factory.create_logger("TEST");
        assert_eq!(logger.name, "TEST");
        assert_eq!(logger.session_id.as_deref(), Some(factory.session_id()));

        let session_id = factory.session_id();
        assert!(!session_id.is_empty());
    }

    #[test]
    fn test_log_entry_serialization() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test".to_string(),
            logger: "TEST".to_string(),
            correlation_id: None,
            fields: HashMap::new(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: LogEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.level, LogLevel::Info);
        assert_eq!(deserialized.message, "Test");
        assert_eq!(deserialized.logger, "TEST");
    }
}
