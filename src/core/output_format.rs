//! Output format configuration for sink lines
//!
//! - Text: `NAMESPACE LEVEL: message ~ metadata` (default)
//! - Json: the record's cached wire encoding

use super::error::Result;
use super::sink::SinkRecord;

#[cfg(feature = "console")]
use colored::Colorize;

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `SVC INFO: request served ~ {"status":200}`
    #[default]
    Text,

    /// Wire record as a single JSON line
    ///
    /// Example: `{"name":null,"hostname":"box","pid":42,...,"v":0,"fields":null}`
    Json,
}

impl OutputFormat {
    /// Format a record according to this output format.
    ///
    /// Colors only apply to the text prefix and never change the text itself.
    pub fn format(&self, record: &SinkRecord, use_colors: bool) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(format_text(record, use_colors)),
            OutputFormat::Json => {
                let bytes = record.record().to_bytes()?;
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn format_text(record: &SinkRecord, use_colors: bool) -> String {
    let entry = record.record();
    let prefix = format!("{} {}:", record.namespace(), entry.level().to_str());
    let prefix = colorize(prefix, entry.level(), use_colors);

    format!("{} {} ~ {}", prefix, entry.message(), format_metadata(record))
}

/// Compact JSON for the metadata; `null` when absent, `{}` when empty.
fn format_metadata(record: &SinkRecord) -> String {
    match record.record().metadata() {
        // Map serialization cannot fail: keys are strings, values are JSON.
        Some(meta) => serde_json::to_string(meta).unwrap_or_else(|_| "{}".to_string()),
        None => "null".to_string(),
    }
}

#[cfg(feature = "console")]
fn colorize(prefix: String, level: super::LogLevel, use_colors: bool) -> String {
    if use_colors {
        prefix.as_str().on_color(level.color_code()).bold().to_string()
    } else {
        prefix
    }
}

#[cfg(not(feature = "console"))]
fn colorize(prefix: String, _level: super::LogLevel, _use_colors: bool) -> String {
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, LogRecord};
    use serde_json::json;
    use std::sync::Arc;

    fn sink_record(level: LogLevel, message: &str, meta: serde_json::Value) -> SinkRecord {
        let record = LogRecord::from_value(level, message, meta).unwrap();
        SinkRecord::new(Arc::from("SVC"), Arc::new(record))
    }

    #[test]
    fn test_text_format_null_metadata() {
        let record = sink_record(LogLevel::Debug, "hi", json!(null));
        let line = OutputFormat::Text.format(&record, false).unwrap();
        assert_eq!(line, "SVC DEBUG: hi ~ null");
    }

    #[test]
    fn test_text_format_distinguishes_empty_metadata() {
        let record = sink_record(LogLevel::Debug, "oh hi", json!({}));
        let line = OutputFormat::Text.format(&record, false).unwrap();
        assert_eq!(line, "SVC DEBUG: oh hi ~ {}");
    }

    #[test]
    fn test_text_format_nested_metadata() {
        let record = sink_record(
            LogLevel::Info,
            "hello",
            json!({ "complex": { "nested": true, "foo": "bar" } }),
        );
        let line = OutputFormat::Text.format(&record, false).unwrap();
        assert!(line.starts_with("SVC INFO: hello ~ {\"complex\":"));
        assert!(line.contains("\"nested\":true"));
        assert!(line.contains("\"foo\":\"bar\""));
    }

    #[test]
    fn test_json_format_matches_wire_bytes() {
        let record = sink_record(LogLevel::Warn, "w", json!({ "a": 1 }));
        let line = OutputFormat::Json.format(&record, true).unwrap();
        assert_eq!(line.as_bytes(), record.record().to_bytes().unwrap());
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_colors_are_additive() {
        colored::control::set_override(true);
        let record = sink_record(LogLevel::Info, "hi", json!(null));
        let line = OutputFormat::Text.format(&record, true).unwrap();
        assert!(line.contains('\u{1b}'));
        assert!(line.ends_with(" hi ~ null"));
        assert!(line.contains("SVC INFO:"));
    }
}
