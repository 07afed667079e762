//! Output formatting and display system
//!
//! This module provides a flexible output formatting system for test results,
//! supporting both colored and plain text output with table formatting.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter, LatencyLevel};
pub use formatter::{
    Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat,
};

use crate::{
    error::Result,
    models::{AggregatedResult, TesterConfig, TestResult},
    types::ConfigKind,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
            max_message_width: 60,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a formatter from the resolved configuration
    pub fn from_config(config: &TesterConfig) -> Box<dyn OutputFormatter> {
        Self::create_formatter(config.enable_color, config.verbose)
    }
}

/// Renders tester outcomes to their final textual form
///
/// Chooses between the human-readable formatter and verbatim JSON, so the
/// application layer never branches on the output mode itself.
pub struct ResultRenderer {
    formatter: Box<dyn OutputFormatter>,
    json_output: bool,
}

impl ResultRenderer {
    /// Create a renderer with an explicit formatter
    pub fn new(formatter: Box<dyn OutputFormatter>, json_output: bool) -> Self {
        Self {
            formatter,
            json_output,
        }
    }

    /// Create a renderer from the resolved configuration
    pub fn from_config(config: &TesterConfig) -> Self {
        Self::new(OutputFormatterFactory::from_config(config), config.json_output)
    }

    /// Render a single or draft test outcome
    pub fn render_single(
        &self,
        kind: ConfigKind,
        config_id: Option<&str>,
        result: &TestResult,
    ) -> Result<String> {
        if self.json_output {
            return Ok(serde_json::to_string_pretty(result)?);
        }

        self.formatter.format_single_result(kind, config_id, result)
    }

    /// Render a bulk test outcome: table plus summary
    pub fn render_aggregated(&self, kind: ConfigKind, results: &AggregatedResult) -> Result<String> {
        if self.json_output {
            return Ok(serde_json::to_string_pretty(results)?);
        }

        let mut output = self.formatter.format_result_table(kind, results)?;
        if !results.is_empty() {
            output.push('\n');
            output.push_str(&self.formatter.format_summary(results)?);
        }
        Ok(output)
    }

    /// Render an error through the active formatter
    pub fn render_error(&self, error: &str) -> Result<String> {
        self.formatter.format_error(error)
    }
}
