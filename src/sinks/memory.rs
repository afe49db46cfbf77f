//! In-memory sink for tests

use crate::core::{Completion, OutputFormat, Sink, SinkRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects formatted lines instead of printing them.
///
/// Clones share the same buffer, so keep one handle for assertions and hand
/// another to the logger.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    use_colors: bool,
    output_format: OutputFormat,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Copy of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Remove and return every line.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &SinkRecord, done: Completion) {
        let result = self
            .output_format
            .format(record, self.use_colors)
            .map(|line| self.lines.lock().push(line));
        done(result);
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, LogRecord};

    fn sink_record(message: &str) -> SinkRecord {
        SinkRecord::new(
            Arc::from("MEM"),
            Arc::new(LogRecord::new(LogLevel::Warn, message, None)),
        )
    }

    #[test]
    fn test_clones_share_lines() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.write(&sink_record("first"), Box::new(|r| assert!(r.is_ok())));
        sink.write(&sink_record("second"), Box::new(|r| assert!(r.is_ok())));

        assert_eq!(
            handle.lines(),
            vec!["MEM WARN: first ~ null", "MEM WARN: second ~ null"]
        );
        assert_eq!(handle.take().len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_json_output() {
        let sink = MemorySink::new().with_output_format(OutputFormat::Json);
        sink.write(&sink_record("wire"), Box::new(|_| {}));

        let parsed: serde_json::Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        assert_eq!(parsed["msg"], "wire");
        assert_eq!(parsed["level"], "warn");
    }
}
