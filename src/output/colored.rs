//! Colored formatter implementation with terminal color support
//!
//! This module provides a rich colored output formatter that uses
//! ANSI colors and Unicode symbols for enhanced visual presentation.

use super::formatter::{FormattingOptions, OutputFormatter, PlainFormatter};
use crate::{
    error::{AppError, Result},
    models::{AggregatedResult, TestResult},
    types::ConfigKind,
};
use colored::*;
use std::fmt::Write as _;

/// Latency classification for color coding first-packet times
#[derive(Debug, Clone, PartialEq)]
pub enum LatencyLevel {
    Fast,     // < 300ms
    Moderate, // 300-1000ms
    Slow,     // > 1000ms
}

impl LatencyLevel {
    /// Classify a first-packet latency in milliseconds
    pub fn from_first_packet(ms: f64) -> Self {
        if ms < 300.0 {
            Self::Fast
        } else if ms < 1000.0 {
            Self::Moderate
        } else {
            Self::Slow
        }
    }

    /// Get color for this latency level
    pub fn color(&self) -> Color {
        match self {
            Self::Fast => Color::Green,
            Self::Moderate => Color::Yellow,
            Self::Slow => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Apply dimmed formatting if colors are enabled
    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// Status glyph and color for a result
    fn status_glyph(&self, result: &TestResult) -> ColoredString {
        if result.ok {
            self.colorize("✓ PASS", self.color_scheme.success)
        } else {
            self.colorize("✗ FAIL", self.color_scheme.error)
        }
    }

    /// Format a first-packet latency with level-based coloring
    fn format_latency_colored(&self, latency_ms: Option<f64>) -> ColoredString {
        let formatted = PlainFormatter::format_latency(latency_ms);
        match latency_ms {
            Some(ms) => self.colorize(&formatted, LatencyLevel::from_first_packet(ms).color()),
            None => self.dimmed(&formatted),
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(
            output,
            "  {}  ",
            self.bold(title).color(self.color_scheme.header)
        )
        .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_single_result(
        &self,
        kind: ConfigKind,
        config_id: Option<&str>,
        result: &TestResult,
    ) -> Result<String> {
        let subject = match config_id {
            Some(id) => format!(
                "{} ({}) {}",
                kind,
                kind.label(),
                self.colorize(id, self.color_scheme.info)
            ),
            None => format!("{} ({})", kind, kind.label()),
        };

        let mut line = format!("{}: {}", subject, self.status_glyph(result));

        if let Some(ms) = result.first_packet_ms {
            let _ = write!(line, " ({})", self.format_latency_colored(Some(ms)));
        }

        if !result.message.is_empty() {
            let color = if result.ok {
                self.color_scheme.muted
            } else {
                self.color_scheme.error
            };
            let _ = write!(line, " - {}", self.colorize(&result.message, color));
        }

        Ok(line)
    }

    fn format_result_table(&self, kind: ConfigKind, results: &AggregatedResult) -> Result<String> {
        if results.is_empty() {
            return Ok(self
                .colorize(
                    &format!("No test results for {} ({}).", kind, kind.label()),
                    self.color_scheme.muted,
                )
                .to_string());
        }

        let mut output = String::new();

        writeln!(
            output,
            "{} {}",
            self.bold(&kind.to_string()).color(self.color_scheme.header),
            self.dimmed(&format!("({})", kind.label()))
        )
        .map_err(|e| AppError::io(format!("Failed to format table: {}", e)))?;
        writeln!(output, "{}", "─".repeat(78).color(self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format table: {}", e)))?;

        let header = format!(
            "{:<30} {:<8} {:>10}  {}",
            "Configuration", "Status", "Latency", "Message"
        );
        writeln!(output, "{}", self.bold(&header))
            .map_err(|e| AppError::io(format!("Failed to format table: {}", e)))?;
        writeln!(output, "{}", "─".repeat(78).color(self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format table: {}", e)))?;

        for (config_id, result) in results {
            let id_display = if config_id.chars().count() > 28 {
                let clipped: String = config_id.chars().take(25).collect();
                format!("{}...", clipped)
            } else {
                config_id.clone()
            };

            // Cells are padded before coloring so ANSI sequences do not
            // disturb the column widths.
            let id_cell = self.colorize(&format!("{:<30}", id_display), self.color_scheme.info);

            let status_cell = if result.ok {
                self.colorize(&format!("{:<8}", "✓ PASS"), self.color_scheme.success)
            } else {
                self.colorize(&format!("{:<8}", "✗ FAIL"), self.color_scheme.error)
            };

            let latency_plain = format!(
                "{:>10}",
                PlainFormatter::format_latency(result.first_packet_ms)
            );
            let latency_cell = match result.first_packet_ms {
                Some(ms) => {
                    self.colorize(&latency_plain, LatencyLevel::from_first_packet(ms).color())
                }
                None => self.dimmed(&latency_plain),
            };

            let message_cell = if result.message.is_empty() {
                self.dimmed("-")
            } else if result.ok {
                self.colorize(&result.message, self.color_scheme.muted)
            } else {
                self.colorize(&result.message, self.color_scheme.error)
            };

            writeln!(
                output,
                "{} {} {}  {}",
                id_cell, status_cell, latency_cell, message_cell
            )
            .map_err(|e| AppError::io(format!("Failed to format table: {}", e)))?;
        }

        Ok(output)
    }

    fn format_summary(&self, results: &AggregatedResult) -> Result<String> {
        let (passed, failed) = results.summary();

        let passed_display = self.colorize(&passed.to_string(), self.color_scheme.success);
        let failed_display = if failed > 0 {
            self.colorize(&failed.to_string(), self.color_scheme.error)
        } else {
            self.dimmed(&failed.to_string())
        };

        Ok(format!(
            "Total: {} | Passed: {} | Failed: {}",
            self.colorize(&results.len().to_string(), self.color_scheme.info),
            passed_display,
            failed_display
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("✗ {}", self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!(
            "! {}",
            self.colorize(warning, self.color_scheme.warning)
        ))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!(
            "✓ {}",
            self.colorize(message, self.color_scheme.success)
        ))
    }
}

/// Helper functions for color management
impl ColoredFormatter {
    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }

    /// Enable or disable colors at runtime
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.options.enable_color = enabled && Self::supports_color();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_color() -> ColoredFormatter {
        ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            ..FormattingOptions::default()
        })
    }

    fn sample_results() -> AggregatedResult {
        let mut agg = AggregatedResult::new();
        agg.insert("cfg-a", TestResult::passed().with_first_packet_ms(120.0));
        agg.insert("cfg-b", TestResult::failure("连接失败"));
        agg
    }

    #[test]
    fn test_latency_level_classification() {
        assert_eq!(LatencyLevel::from_first_packet(50.0), LatencyLevel::Fast);
        assert_eq!(LatencyLevel::from_first_packet(299.9), LatencyLevel::Fast);
        assert_eq!(
            LatencyLevel::from_first_packet(300.0),
            LatencyLevel::Moderate
        );
        assert_eq!(
            LatencyLevel::from_first_packet(999.9),
            LatencyLevel::Moderate
        );
        assert_eq!(LatencyLevel::from_first_packet(1000.0), LatencyLevel::Slow);
    }

    #[test]
    fn test_latency_level_colors() {
        assert_eq!(LatencyLevel::Fast.color(), Color::Green);
        assert_eq!(LatencyLevel::Moderate.color(), Color::Yellow);
        assert_eq!(LatencyLevel::Slow.color(), Color::Red);
    }

    #[test]
    fn test_status_glyphs_without_color() {
        let formatter = no_color();
        let pass = formatter
            .format_single_result(ConfigKind::Llm, Some("cfg-1"), &TestResult::passed())
            .unwrap();
        assert!(pass.contains("✓ PASS"));

        let fail = formatter
            .format_single_result(ConfigKind::Llm, Some("cfg-1"), &TestResult::failure("bad"))
            .unwrap();
        assert!(fail.contains("✗ FAIL"));
        assert!(fail.contains("bad"));
    }

    #[test]
    fn test_table_contains_all_rows() {
        let output = no_color()
            .format_result_table(ConfigKind::Tts, &sample_results())
            .unwrap();

        assert!(output.contains("tts"));
        assert!(output.contains("语音合成"));
        assert!(output.contains("cfg-a"));
        assert!(output.contains("cfg-b"));
        assert!(output.contains("120ms"));
        assert!(output.contains("连接失败"));
    }

    #[test]
    fn test_empty_table_message() {
        let output = no_color()
            .format_result_table(ConfigKind::Ota, &AggregatedResult::new())
            .unwrap();
        assert!(output.contains("No test results"));
    }

    #[test]
    fn test_summary_counts() {
        let output = no_color().format_summary(&sample_results()).unwrap();
        assert!(output.contains("Total: 2"));
        assert!(output.contains("Passed: 1"));
        assert!(output.contains("Failed: 1"));
    }

    #[test]
    fn test_message_helpers() {
        let formatter = no_color();
        assert!(formatter.format_error("boom").unwrap().contains("boom"));
        assert!(formatter.format_warning("careful").unwrap().contains("careful"));
        assert!(formatter.format_success("done").unwrap().contains("done"));
    }
}
