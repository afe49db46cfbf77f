//! Core logger types and traits

pub mod async_sink;
pub mod capture;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod namespace;
pub mod output_format;
pub mod sink;
pub mod whitelist;

pub use async_sink::AsyncSink;
pub use capture::CaptureStore;
pub use dispatcher::Dispatcher;
pub use error::{LoggerError, Result};
pub use gate::{Environment, GateConfig, GateOptions, DEBUG_SELECTOR_VAR, TRACE_VAR};
pub use log_level::LogLevel;
pub use log_record::{metadata_from_value, Identity, LogRecord, Metadata, WireRecord};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use namespace::Namespace;
pub use output_format::OutputFormat;
pub use sink::{Completion, Sink, SinkRecord};
pub use whitelist::WhitelistTable;
