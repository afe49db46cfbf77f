//! Sink implementations

pub mod background;
pub mod console;
pub mod json;
pub mod memory;

#[cfg(feature = "async-sinks")]
pub mod tokio_sink;

pub use background::BackgroundSink;
pub use console::ConsoleSink;
pub use json::JsonSink;
pub use memory::MemorySink;

#[cfg(feature = "async-sinks")]
pub use tokio_sink::TokioSink;

pub use crate::core::Sink;
pub use crate::core::AsyncSink;
