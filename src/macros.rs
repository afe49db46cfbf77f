//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and log with null
//! metadata.
//!
//! # Examples
//!
//! ```
//! use debug_logtron::prelude::*;
//! use debug_logtron::info;
//!
//! let logger = Logger::builder("server")
//!     .env(Environment::new())
//!     .sink(MemorySink::new())
//!     .build()?;
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use debug_logtron::prelude::*;
/// # let logger = Logger::builder("doc").env(Environment::new()).sink(MemorySink::new()).build()?;
/// use debug_logtron::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Warn, "Retry in {}s", 5);
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), None)
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log an access-level message.
///
/// # Examples
///
/// ```
/// # use debug_logtron::prelude::*;
/// # let logger = Logger::builder("doc").verbose(true).env(Environment::new()).sink(MemorySink::new()).build()?;
/// use debug_logtron::access;
/// access!(logger, "GET {} {}", "/health", 200);
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! access {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Access, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message. Panics unless the message is whitelisted.
///
/// # Examples
///
/// ```
/// # use debug_logtron::prelude::*;
/// # let logger = Logger::builder("doc").env(Environment::new()).sink(MemorySink::new()).build()?;
/// use debug_logtron::error;
/// logger.whitelist(LogLevel::Error, "Connection failed: timeout");
/// error!(logger, "Connection failed: {}", "timeout");
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Panics unless the message is whitelisted.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
