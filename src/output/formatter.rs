//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::{AggregatedResult, TestResult},
    types::ConfigKind,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format a single-probe result line
    fn format_single_result(
        &self,
        kind: ConfigKind,
        config_id: Option<&str>,
        result: &TestResult,
    ) -> Result<String>;

    /// Format bulk results as a table
    fn format_result_table(&self, kind: ConfigKind, results: &AggregatedResult) -> Result<String>;

    /// Format the pass/fail summary line for a bulk run
    fn format_summary(&self, results: &AggregatedResult) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with untruncated messages
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum width for the message column
    pub max_message_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_message_width: 60,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
    /// Show header row
    pub show_header: bool,
    /// Minimum column width
    pub min_column_width: usize,
    /// Maximum column width
    pub max_column_width: usize,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
    /// Maximum width
    pub max_width: usize,
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given format and data
    fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> Result<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        // Calculate column widths
        let column_widths = self.calculate_column_widths(format, rows);

        let mut output = String::new();

        // Header
        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        // Data rows
        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        // Bottom border
        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        Ok(output)
    }

    /// Calculate optimal column widths
    ///
    /// Widths are char-based, not display-cell based, so rows holding wide
    /// CJK glyphs can overrun their column slightly.
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let mut widths = Vec::new();
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        for col_idx in 0..num_columns {
            let mut max_width = if col_idx < format.columns.len() {
                format.columns[col_idx]
                    .min_width
                    .max(format.columns[col_idx].header.chars().count())
            } else {
                format.min_column_width
            };

            // Find maximum content width in this column
            for row in rows {
                if col_idx < row.len() {
                    max_width = max_width.max(row[col_idx].chars().count());
                }
            }

            // Apply column constraints
            if col_idx < format.columns.len() {
                let col = &format.columns[col_idx];
                max_width = max_width.min(col.max_width);
            } else {
                max_width = max_width.min(format.max_column_width);
            }

            widths.push(max_width);
        }

        widths
    }

    /// Create a table row
    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = if idx < format.columns.len() {
                &format.columns[idx].alignment
            } else {
                &Alignment::Left
            };

            let padded_cell = self.align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&padded_cell);
            if format.show_borders {
                row.push(' ');
                row.push('|');
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }

    /// Align text within specified width
    fn align_text(&self, text: &str, width: usize, alignment: &Alignment) -> String {
        let char_count = text.chars().count();
        if char_count >= width {
            return text.chars().take(width).collect();
        }

        let padding = width - char_count;
        match alignment {
            Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
            Alignment::Right => format!("{}{}", " ".repeat(padding), text),
            Alignment::Center => {
                let left_pad = padding / 2;
                let right_pad = padding - left_pad;
                format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
            }
        }
    }

    /// Format a first-packet latency in human-readable form
    pub(super) fn format_latency(latency_ms: Option<f64>) -> String {
        match latency_ms {
            Some(ms) if ms < 1.0 => format!("{:.2}ms", ms),
            Some(ms) if ms < 1000.0 => format!("{:.0}ms", ms),
            Some(ms) => format!("{:.2}s", ms / 1000.0),
            None => "-".to_string(),
        }
    }

    /// Clip a message to the configured column width
    fn clip_message(&self, message: &str) -> String {
        if self.options.verbose_mode {
            return message.to_string();
        }

        let max = self.options.max_message_width;
        if message.chars().count() > max {
            let clipped: String = message.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", clipped)
        } else {
            message.to_string()
        }
    }

    /// Build the shared bulk-result rows: identifier, status, latency, message
    pub(super) fn result_rows(&self, results: &AggregatedResult) -> Vec<RowData> {
        results
            .iter()
            .map(|(config_id, result)| {
                vec![
                    config_id.clone(),
                    result.status_label().to_string(),
                    Self::format_latency(result.first_packet_ms),
                    self.clip_message(&result.message),
                ]
            })
            .collect()
    }

    /// Column layout shared by the plain and colored tables
    pub(super) fn result_table_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column {
                    header: "Configuration".to_string(),
                    alignment: Alignment::Left,
                    min_width: 13,
                    max_width: 40,
                },
                Column {
                    header: "Status".to_string(),
                    alignment: Alignment::Center,
                    min_width: 6,
                    max_width: 6,
                },
                Column {
                    header: "Latency".to_string(),
                    alignment: Alignment::Right,
                    min_width: 8,
                    max_width: 10,
                },
                Column {
                    header: "Message".to_string(),
                    alignment: Alignment::Left,
                    min_width: 7,
                    max_width: self.options.max_message_width.max(7),
                },
            ],
            show_borders: self.options.table_borders,
            show_header: true,
            min_column_width: 6,
            max_column_width: 60,
        }
    }

    /// One-line rendering of a single result
    pub(super) fn single_result_line(
        kind: ConfigKind,
        config_id: Option<&str>,
        result: &TestResult,
    ) -> String {
        let subject = match config_id {
            Some(id) => format!("{} ({}) {}", kind, kind.label(), id),
            None => format!("{} ({})", kind, kind.label()),
        };

        let mut line = format!("{}: {}", subject, result.status_label());

        if let Some(ms) = result.first_packet_ms {
            let _ = write!(line, " ({})", Self::format_latency(Some(ms)));
        }

        if !result.message.is_empty() {
            let _ = write!(line, " - {}", result.message);
        }

        line
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_single_result(
        &self,
        kind: ConfigKind,
        config_id: Option<&str>,
        result: &TestResult,
    ) -> Result<String> {
        Ok(Self::single_result_line(kind, config_id, result))
    }

    fn format_result_table(&self, kind: ConfigKind, results: &AggregatedResult) -> Result<String> {
        if results.is_empty() {
            return Ok(format!(
                "No test results for {} ({}).",
                kind,
                kind.label()
            ));
        }

        let rows = self.result_rows(results);
        self.create_table(&self.result_table_format(), &rows)
    }

    fn format_summary(&self, results: &AggregatedResult) -> Result<String> {
        let (passed, failed) = results.summary();
        Ok(format!(
            "Total: {} | Passed: {} | Failed: {}",
            results.len(),
            passed,
            failed
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
