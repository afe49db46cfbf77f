//! Main logger implementation

use super::{
    capture::CaptureStore,
    dispatcher::Dispatcher,
    error::Result,
    gate::{Environment, GateConfig, GateOptions},
    log_level::LogLevel,
    log_record::{Identity, LogRecord, Metadata},
    metrics::LoggerMetrics,
    namespace::Namespace,
    sink::{Completion, Sink, SinkRecord},
    whitelist::WhitelistTable,
};
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

#[derive(Default)]
struct CaptureState {
    whitelist: WhitelistTable,
    captures: CaptureStore,
}

/// Namespaced logger with verbosity gating and whitelist capture.
///
/// Every call goes through the same steps:
/// 1. whitelisted `(level, message)` pairs are captured and the call returns;
/// 2. otherwise the gate decides whether sinks see the record;
/// 3. error and fatal records panic with their message once written.
///
/// # Example
///
/// ```
/// use debug_logtron::prelude::*;
///
/// let lines = MemorySink::new();
/// let logger = Logger::builder("svc")
///     .env(Environment::new())
///     .sink(lines.clone())
///     .build()?;
///
/// logger.whitelist(LogLevel::Error, "expected failure");
/// logger.error("expected failure", None);
///
/// assert_eq!(logger.pop_logs("expected failure").len(), 1);
/// assert!(lines.is_empty());
/// # Ok::<(), LoggerError>(())
/// ```
pub struct Logger {
    namespace: Namespace,
    display_namespace: Arc<str>,
    gate: GateConfig,
    identity: Identity,
    state: Mutex<CaptureState>,
    dispatcher: Dispatcher,
    /// Counters behind `is_empty` and observability
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger reading the process environment and writing to stderr.
    pub fn new(namespace: &str) -> Result<Self> {
        Self::builder(namespace).build()
    }

    #[must_use]
    pub fn builder(namespace: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(namespace)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn gate(&self) -> GateConfig {
        self.gate
    }

    pub fn whitelist(&self, level: LogLevel, message: impl Into<String>) {
        self.state.lock().whitelist.insert(level, message);
    }

    pub fn unwhitelist(&self, level: LogLevel, message: &str) {
        self.state.lock().whitelist.remove(level, message);
    }

    pub fn is_whitelisted(&self, level: LogLevel, message: &str) -> bool {
        self.state.lock().whitelist.contains(level, message)
    }

    /// Snapshot of every captured record, oldest first.
    pub fn items(&self) -> Vec<Arc<LogRecord>> {
        self.state.lock().captures.items()
    }

    /// Drain the records captured for `message`. A second call returns an
    /// empty vector.
    pub fn pop_logs(&self, message: &str) -> Vec<Arc<LogRecord>> {
        self.state.lock().captures.pop(message)
    }

    /// True when nothing was written and no captured message is pending.
    pub fn is_empty(&self) -> bool {
        self.metrics.total_logged() == 0 && !self.state.lock().captures.has_pending()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, metadata: Option<Metadata>) {
        self.write(self.record(level, message, metadata), Box::new(|_| {}));
    }

    /// Log and get notified once every sink finished (or the first failed).
    ///
    /// For error and fatal records the callback runs before the panic.
    pub fn log_with_callback<F>(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        metadata: Option<Metadata>,
        on_complete: F,
    ) where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        self.write(self.record(level, message, metadata), Box::new(on_complete));
    }

    /// Log with dynamically typed metadata.
    ///
    /// Metadata that is neither `null` nor an object is rejected before any
    /// sink or capture sees the record.
    pub fn log_value(&self, level: LogLevel, message: impl Into<String>, metadata: Value) -> Result<()> {
        let record = LogRecord::from_value(level, message, metadata)?;
        self.write(self.attach_identity(record), Box::new(|_| {}));
        Ok(())
    }

    /// Run a prepared record through whitelist, gate and sinks.
    pub fn write(&self, record: LogRecord, on_complete: Completion) {
        let record = Arc::new(record);
        let level = record.level();

        {
            let mut state = self.state.lock();
            if state.whitelist.contains(level, record.message()) {
                state.captures.capture(Arc::clone(&record));
                drop(state);

                self.metrics.record_captured();
                on_complete(Ok(()));
                return;
            }
        }

        if self.gate.should_emit(level) {
            self.metrics.record_logged();
            let sink_record = SinkRecord::new(Arc::clone(&self.display_namespace), record);
            self.dispatcher.dispatch(&sink_record, on_complete);
        } else {
            self.metrics.record_dropped();
            on_complete(Ok(()));
        }
    }

    fn record(&self, level: LogLevel, message: impl Into<String>, metadata: Option<Metadata>) -> LogRecord {
        self.attach_identity(LogRecord::new(level, message, metadata))
    }

    fn attach_identity(&self, record: LogRecord) -> LogRecord {
        if self.identity == Identity::default() {
            record
        } else {
            record.with_identity(self.identity.clone())
        }
    }

    /// Get the logger metrics
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.dispatcher.flush()
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>, metadata: Option<Metadata>) {
        self.log(LogLevel::Trace, message, metadata);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>, metadata: Option<Metadata>) {
        self.log(LogLevel::Debug, message, metadata);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>, metadata: Option<Metadata>) {
        self.log(LogLevel::Info, message, metadata);
    }

    #[inline]
    pub fn access(&self, message: impl Into<String>, metadata: Option<Metadata>) {
        self.log(LogLevel::Access, message, metadata);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>, metadata: Option<Metadata>) {
        self.log(LogLevel::Warn, message, metadata);
    }

    /// Panics with `message` unless whitelisted.
    #[inline]
    pub fn error(&self, message: impl Into<String>, metadata: Option<Metadata>) {
        self.log(LogLevel::Error, message, metadata);
    }

    /// Panics with `message` unless whitelisted.
    #[inline]
    pub fn fatal(&self, message: impl Into<String>, metadata: Option<Metadata>) {
        self.log(LogLevel::Fatal, message, metadata);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use debug_logtron::prelude::*;
///
/// let env = Environment::new().with_var("NODE_DEBUG", "svc");
/// let logger = Logger::builder("svc")
///     .env(env)
///     .sink(MemorySink::new())
///     .build()?;
///
/// assert!(logger.gate().verbose);
/// assert!(logger.gate().enabled);
/// # Ok::<(), LoggerError>(())
/// ```
pub struct LoggerBuilder {
    namespace: String,
    options: GateOptions,
    env: Option<Environment>,
    sinks: Vec<Arc<dyn Sink>>,
    use_colors: bool,
    identity: Identity,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            options: GateOptions::default(),
            env: None,
            sinks: Vec::new(),
            use_colors: true,
            identity: Identity::default(),
        }
    }

    /// Gate warn/info output (default on)
    #[must_use = "builder methods return a new value"]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.options.enabled = Some(enabled);
        self
    }

    /// Gate access/debug output; also forces `enabled`
    #[must_use = "builder methods return a new value"]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = Some(verbose);
        self
    }

    /// Gate trace output
    #[must_use = "builder methods return a new value"]
    pub fn trace(mut self, trace: bool) -> Self {
        self.options.trace = Some(trace);
        self
    }

    /// Replace all gate flags at once
    #[must_use = "builder methods return a new value"]
    pub fn options(mut self, options: GateOptions) -> Self {
        self.options = options;
        self
    }

    /// Environment to resolve the debug selector and trace flag from.
    ///
    /// Defaults to a snapshot of the process environment taken in `build`.
    #[must_use = "builder methods return a new value"]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Colors for the default console sink
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Add a sink. Without any, records go to a [`ConsoleSink`].
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add a sink that is also held elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Identity fields stamped onto every wire record
    #[must_use = "builder methods return a new value"]
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Validate the namespace, resolve the gate and build the Logger
    pub fn build(self) -> Result<Logger> {
        let namespace = Namespace::parse(&self.namespace)?;
        let env = self.env.unwrap_or_else(Environment::from_process);
        let gate = GateConfig::resolve(&namespace, &self.options, &env);

        let mut sinks = self.sinks;
        if sinks.is_empty() {
            sinks.push(Arc::new(ConsoleSink::with_colors(self.use_colors)));
        }

        let metrics = Arc::new(LoggerMetrics::new());

        Ok(Logger {
            display_namespace: Arc::from(namespace.upper()),
            namespace,
            gate,
            identity: self.identity,
            state: Mutex::new(CaptureState::default()),
            dispatcher: Dispatcher::new(sinks, Arc::clone(&metrics)),
            metrics,
        })
    }
}
