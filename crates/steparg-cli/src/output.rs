//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialised
//! rendering for conversion and probe reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value as Json;
use std::io::{self, Write};
use tracing::trace;

/// Outcome of `steparg convert`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversionReport {
    pub input: Json,
    pub target: String,
    pub locale: String,
    /// Transformation that produced the value, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
    pub value_type: String,
    pub value: Json,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Outcome of `steparg probe`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProbeReport {
    pub input: Json,
    pub target: String,
    pub locale: String,
    pub convertible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
}

/// Trait for formatting output with specialized support for reports
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    fn format_conversion(&self, report: &ConversionReport, use_color: bool) -> Result<String>;

    fn format_probe(&self, report: &ProbeReport, use_color: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human readers get pretty JSON for arbitrary data
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_conversion(&self, report: &ConversionReport, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_conversion_human(report, use_color)),
            _ => self.format(report),
        }
    }

    fn format_probe(&self, report: &ProbeReport, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_probe_human(report, use_color)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a conversion report
    pub fn conversion(&mut self, report: &ConversionReport) -> Result<()> {
        trace!(target_type = %report.target, "Writing conversion report");
        let formatted = self.format.format_conversion(report, self.use_color)?;
        self.emit(formatted)
    }

    /// Write a probe report
    pub fn probe(&mut self, report: &ProbeReport) -> Result<()> {
        trace!(target_type = %report.target, "Writing probe report");
        let formatted = self.format.format_probe(report, self.use_color)?;
        self.emit(formatted)
    }

    // YAML already ends with a newline; the other formats do not
    fn emit(&mut self, formatted: String) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }
}

fn format_conversion_human(report: &ConversionReport, use_color: bool) -> String {
    let mut output = String::new();

    for warning in &report.warnings {
        let line = format!("warning: {}", warning);
        if use_color {
            output.push_str(&line.yellow().to_string());
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }

    let rendered = render_json(&report.value);
    if use_color {
        output.push_str(&format!("{} : {}", rendered.bold(), report.value_type.cyan()));
    } else {
        output.push_str(&format!("{} : {}", rendered, report.value_type));
    }

    if let Some(name) = &report.transformation {
        output.push_str(&format!("\n  via transformation '{}'", name));
    }
    if report.locale != "invariant" {
        output.push_str(&format!("\n  locale {}", report.locale));
    }

    output
}

fn format_probe_human(report: &ProbeReport, use_color: bool) -> String {
    let input = render_json(&report.input);
    let verdict = if report.convertible {
        format!("✓ {} can be converted to {}", input, report.target)
    } else {
        format!("✗ {} cannot be converted to {}", input, report.target)
    };

    let mut output = match (use_color, report.convertible) {
        (true, true) => verdict.green().to_string(),
        (true, false) => verdict.red().to_string(),
        (false, _) => verdict,
    };
    if let Some(name) = &report.transformation {
        output.push_str(&format!("\n  via transformation '{}'", name));
    }
    output
}

/// Compact single-line JSON; strings are quoted so empty text stays visible
fn render_json(value: &Json) -> String {
    match value {
        Json::Null => "null".to_string(),
        Json::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}
