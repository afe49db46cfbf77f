//! Sink trait for log output destinations

use super::{error::Result, log_record::LogRecord};
use std::sync::Arc;

/// Completion handle passed to [`Sink::write`]. Must be invoked exactly once.
pub type Completion = Box<dyn FnOnce(Result<()>) + Send + 'static>;

/// What a sink receives for every record that passed the gate.
#[derive(Debug, Clone)]
pub struct SinkRecord {
    namespace: Arc<str>,
    record: Arc<LogRecord>,
}

impl SinkRecord {
    pub fn new(namespace: Arc<str>, record: Arc<LogRecord>) -> Self {
        Self { namespace, record }
    }

    /// Upper-cased logger namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn record(&self) -> &LogRecord {
        &self.record
    }
}

/// An output destination.
///
/// `write` may complete synchronously or hand the record to another thread
/// and invoke `done` later. Failures go through `done`, never a panic.
pub trait Sink: Send + Sync {
    fn write(&self, record: &SinkRecord, done: Completion);

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
