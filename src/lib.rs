//! # Debug Logtron
//!
//! A namespaced diagnostic logger that doubles as a test harness.
//!
//! ## Features
//!
//! - **Verbosity Gate**: warn/info, access/debug and trace are switched by
//!   `enabled`, `verbose` and `trace`; error/fatal always pass
//! - **Debug Selector**: `NODE_DEBUG=<namespace>` turns on verbose output
//! - **Whitelist Capture**: expected messages are captured for assertions
//!   instead of being written
//! - **Fail Fast**: error and fatal records panic after they are written
//! - **Multiple Sinks**: console, in-memory, JSON lines, background worker,
//!   and async sinks on tokio

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Completion, Environment, GateConfig, GateOptions, Identity, LogLevel, LogRecord, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, Metadata, OutputFormat, Result, Sink,
        SinkRecord,
    };
    pub use crate::sinks::{ConsoleSink, JsonSink, MemorySink};
}

pub use crate::core::{
    metadata_from_value, AsyncSink, CaptureStore, Completion, Environment, GateConfig,
    GateOptions, Identity, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    Metadata, Namespace, OutputFormat, Result, Sink, SinkRecord, WhitelistTable, WireRecord,
    DEBUG_SELECTOR_VAR, TRACE_VAR,
};
pub use sinks::{BackgroundSink, ConsoleSink, JsonSink, MemorySink};
