//! Output format for encoded records
//!
//! - Json: one JSON object per line, fields in record order
//! - Text: human-readable line for development consoles

use super::error::Result;
use super::record::Record;

/// Output format for records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Machine-readable JSON lines (default)
    ///
    /// Example: `{"ts":"2025-01-08T10:30:45+00:00","level":"info","msg":"Request processed"}`
    #[default]
    Json,

    /// Human-readable text
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] api - Request processed userID=42`
    Text { use_colors: bool },
}

impl OutputFormat {
    /// Encode a record into one newline-terminated line
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let mut line = match self {
            OutputFormat::Json => serde_json::to_vec(record)?,
            OutputFormat::Text { use_colors } => Self::format_text(record, *use_colors).into_bytes(),
        };
        line.push(b'\n');
        Ok(line)
    }

    fn format_text(record: &Record, use_colors: bool) -> String {
        let level_str = Self::level_label(record, use_colors);
        let mut line = format!(
            "[{}] [{}] {} - {}",
            record.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            level_str,
            record.logger,
            record.message
        );

        for field in &record.fields {
            line.push(' ');
            line.push_str(&field.to_string());
        }
        line
    }

    #[cfg(feature = "console")]
    fn level_label(record: &Record, use_colors: bool) -> String {
        use colored::Colorize;

        let label = format!("{:5}", record.level.capital_str());
        if use_colors {
            label.color(record.level.color_code()).to_string()
        } else {
            label
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_label(record: &Record, _use_colors: bool) -> String {
        format!("{:5}", record.level.capital_str())
    }
}
