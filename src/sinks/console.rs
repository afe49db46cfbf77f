//! Console sink implementation

use crate::core::{Completion, OutputFormat, Sink, SinkRecord};
use std::io::Write;

/// Writes every record as one line on stderr.
pub struct ConsoleSink {
    use_colors: bool,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use debug_logtron::sinks::ConsoleSink;
    /// use debug_logtron::OutputFormat;
    ///
    /// let sink = ConsoleSink::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: &SinkRecord, done: Completion) {
        let result = self
            .output_format
            .format(record, self.use_colors)
            .and_then(|line| {
                let mut stderr = std::io::stderr().lock();
                writeln!(stderr, "{}", line)?;
                Ok(())
            });
        done(result);
    }

    fn flush(&self) -> crate::core::Result<()> {
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
