//! Adapter running an [`AsyncSink`] on a tokio runtime

use crate::core::{AsyncSink, Completion, LoggerError, Result, Sink, SinkRecord};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Mutex;

/// Bridges an [`AsyncSink`] onto the callback-based [`Sink`] interface.
///
/// Each write is spawned as a task on the runtime; the completion fires when
/// the task finishes, so completions may arrive in any order relative to
/// other sinks. Writes to the wrapped sink are serialized by an async mutex.
///
/// Error and fatal records block the logging thread until the task finished,
/// so they must not be logged from a current-thread runtime driving this sink.
pub struct TokioSink<S: AsyncSink + 'static> {
    inner: Arc<Mutex<S>>,
    runtime: Handle,
    name: String,
}

impl<S: AsyncSink + 'static> TokioSink<S> {
    pub fn new(inner: S, runtime: Handle) -> Self {
        let name = format!("tokio({})", inner.name());
        Self {
            inner: Arc::new(Mutex::new(inner)),
            runtime,
            name,
        }
    }

    /// Use the runtime the caller is currently running on.
    pub fn current(inner: S) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| LoggerError::config("TokioSink", e.to_string()))?;
        Ok(Self::new(inner, runtime))
    }
}

impl<S: AsyncSink + 'static> Sink for TokioSink<S> {
    fn write(&self, record: &SinkRecord, done: Completion) {
        let inner = Arc::clone(&self.inner);
        let record = record.clone();
        self.runtime.spawn(async move {
            let result = inner.lock().await.write(&record).await;
            done(result);
        });
    }

    /// Blocks on the runtime until the wrapped sink is flushed.
    ///
    /// From inside a runtime this is a no-op: blocking there would panic, and
    /// pending writes settle as their tasks finish.
    fn flush(&self) -> Result<()> {
        if Handle::try_current().is_ok() {
            return Ok(());
        }

        let inner = Arc::clone(&self.inner);
        self.runtime
            .block_on(async move { inner.lock().await.flush().await })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
