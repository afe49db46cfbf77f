//! Async sink trait for non-blocking log output

use super::{error::Result, sink::SinkRecord};
use async_trait::async_trait;

/// Trait for asynchronous log sinks
///
/// Bridged onto the callback-based [`Sink`](super::Sink) interface by
/// `TokioSink` (feature `async-sinks`).
///
/// # Example
///
/// ```no_run
/// use debug_logtron::core::{AsyncSink, Result, SinkRecord};
/// use async_trait::async_trait;
///
/// struct MyAsyncSink;
///
/// #[async_trait]
/// impl AsyncSink for MyAsyncSink {
///     async fn write(&mut self, record: &SinkRecord) -> Result<()> {
///         // Async write logic
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "my_async_sink"
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncSink: Send + Sync {
    /// Write a record asynchronously
    async fn write(&mut self, record: &SinkRecord) -> Result<()>;

    /// Flush buffered records asynchronously
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get the sink name
    fn name(&self) -> &str;
}
