//! JSON sink for structured logging

use crate::core::{Completion, Result, Sink, SinkRecord};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes each record's wire encoding as a single JSON line (JSONL).
///
/// The bytes are the record's cached encoding, so several JSON sinks share
/// one serialization.
pub struct JsonSink<W: Write + Send = File> {
    writer: Mutex<BufWriter<W>>,
}

impl JsonSink<File> {
    /// Append to the file at `path`, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        Ok(Self::new(file))
    }
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
        }
    }

    fn write_line(&self, record: &SinkRecord) -> Result<()> {
        let bytes = record.record().to_bytes()?;
        let mut writer = self.writer.lock();
        writer.write_all(bytes)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write + Send> Sink for JsonSink<W> {
    fn write(&self, record: &SinkRecord, done: Completion) {
        done(self.write_line(record));
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

impl<W: Write + Send> Drop for JsonSink<W> {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the writer
        let _ = self.writer.get_mut().flush();
    }
}
