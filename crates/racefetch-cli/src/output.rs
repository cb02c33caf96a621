//! Output formatting and writing utilities
//!
//! Results are written to stdout in JSON, pretty JSON, YAML or a
//! human-readable layout. Logs never go through this module.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use racefetch_core::ProviderResponse;
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// One row of a computed race order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderEntry {
    pub position: usize,
    pub name: String,
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<usize>,
    /// Header values with credentials redacted
    pub headers: Vec<(String, String)>,
}

/// Formatting with specialized support for racefetch results
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a winning response
    fn format_response(&self, response: &ProviderResponse) -> Result<String>;

    /// Format a race order
    fn format_order(&self, entries: &[OrderEntry]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => {
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_response(&self, response: &ProviderResponse) -> Result<String> {
        match self {
            OutputFormat::Human => format_response_human(response),
            _ => self.format(response),
        }
    }

    fn format_order(&self, entries: &[OrderEntry]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_order_human(entries)),
            _ => self.format(&entries),
        }
    }
}

fn format_response_human(response: &ProviderResponse) -> Result<String> {
    let mut lines = vec![
        format!("Provider: {}", response.provider),
        format!("Status:   {}", response.response_status),
    ];

    if !response.response_headers.is_empty() {
        lines.push("Headers:".to_string());
        for (name, value) in &response.response_headers {
            lines.push(format!("  {}: {}", name, value));
        }
    }

    lines.push("Payload:".to_string());
    match (response.text(), response.xml()) {
        (Some(text), _) | (_, Some(text)) => lines.push(text.to_string()),
        _ => lines.push(serde_json::to_string_pretty(&response.payload)?),
    }

    Ok(lines.join("\n"))
}

fn format_order_human(entries: &[OrderEntry]) -> String {
    if entries.is_empty() {
        return "No providers".to_string();
    }

    let mut lines = Vec::new();
    for entry in entries {
        let priority = entry
            .priority
            .map(|p| format!(" (priority {})", p))
            .unwrap_or_default();
        lines.push(format!(
            "{}. {}{} {} {}",
            entry.position, entry.name, priority, entry.method, entry.url
        ));
        for (name, value) in &entry.headers {
            lines.push(format!("     {}: {}", name, value));
        }
    }
    lines.join("\n")
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

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a success message (human format only)
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

    /// Write a section header (human format only)
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("=== {} ===", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write a winning response
    pub fn response(&mut self, response: &ProviderResponse) -> Result<()> {
        trace!(provider = %response.provider, "Writing response");
        let formatted = self.format.format_response(response)?;
        self.emit(&formatted)
    }

    /// Write a race order
    pub fn order(&mut self, entries: &[OrderEntry]) -> Result<()> {
        let formatted = self.format.format_order(entries)?;
        self.emit(&formatted)
    }

    // YAML already ends with a newline
    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            write!(self.writer, "{}", formatted)?;
            self.writer.flush()?;
            Ok(())
        } else {
            self.writeln(formatted)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests;
