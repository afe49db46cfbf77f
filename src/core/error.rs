//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Namespace contains characters outside `[A-Za-z0-9]`
    #[error(
        "Unexpected characters in the '{namespace}' arg.\n\
         Expected the namespace to be a bare word but instead found {bad_char} character.\n\
         SUGGESTED FIX: Use just alphanum in the namespace."
    )]
    InvalidNamespace {
        namespace: String,
        bad_char: &'static str,
        reason: &'static str,
    },

    /// Metadata must be null or a mapping
    #[error("meta must be an object, found {found}")]
    InvalidMetadata { found: &'static str },

    /// Unknown level name or rank
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A sink reported a failed write
    #[error("Sink '{sink}' failed: {message}")]
    SinkError { sink: String, message: String },

    /// Background worker is gone
    #[error("Failed to send log record to background worker")]
    ChannelSendError,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    pub fn invalid_metadata(found: &'static str) -> Self {
        LoggerError::InvalidMetadata { found }
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkError {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
