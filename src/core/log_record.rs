//! Log record structure and its wire representation

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured metadata attached to a record.
pub type Metadata = serde_json::Map<String, Value>;

/// Wire schema version.
pub const WIRE_VERSION: u8 = 0;

// Resolved once per process; the wire record only ever reads it.
static HOSTNAME: Lazy<String> = Lazy::new(resolve_hostname);

#[cfg(unix)]
fn resolve_hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) if !name.is_empty() => name.to_string_lossy().into_owned(),
        Ok(_) => "localhost".to_string(),
        Err(e) => {
            eprintln!("[LOGGER WARNING] Failed to read host name: {}. Using 'localhost'.", e);
            "localhost".to_string()
        }
    }
}

#[cfg(not(unix))]
fn resolve_hostname() -> String {
    "localhost".to_string()
}

/// Host name reported in every wire record.
pub fn hostname() -> &'static str {
    &HOSTNAME
}

/// Validate a dynamic metadata value.
///
/// `null` becomes `None`, an object becomes its map; anything else is
/// rejected before the record ever reaches a sink.
pub fn metadata_from_value(value: Value) -> Result<Option<Metadata>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        Value::Bool(_) => Err(LoggerError::invalid_metadata("boolean")),
        Value::Number(_) => Err(LoggerError::invalid_metadata("number")),
        Value::String(_) => Err(LoggerError::invalid_metadata("string")),
        Value::Array(_) => Err(LoggerError::invalid_metadata("array")),
    }
}

/// Identity fields of the wire record. All null unless set upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: Option<String>,
    pub component: Option<String>,
    pub src: Option<String>,
}

/// Bunyan-compatible structural view of a [`LogRecord`].
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub name: Option<String>,
    pub hostname: String,
    pub pid: u32,
    pub component: Option<String>,
    pub level: LogLevel,
    pub msg: String,
    pub time: String,
    pub src: Option<String>,
    pub v: u8,
    pub fields: Option<Metadata>,
}

/// One log call.
///
/// Immutable after construction. The wire record and its byte encoding are
/// computed on first use and the same cached value is returned afterwards.
#[derive(Debug)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    metadata: Option<Metadata>,
    timestamp: DateTime<Utc>,
    identity: Identity,
    wire: OnceCell<WireRecord>,
    bytes: OnceCell<Vec<u8>>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>, metadata: Option<Metadata>) -> Self {
        Self {
            level,
            message: message.into(),
            metadata,
            timestamp: Utc::now(),
            identity: Identity::default(),
            wire: OnceCell::new(),
            bytes: OnceCell::new(),
        }
    }

    /// Build a record from dynamically typed metadata, validating it first.
    pub fn from_value(level: LogLevel, message: impl Into<String>, metadata: Value) -> Result<Self> {
        let metadata = metadata_from_value(metadata)?;
        Ok(Self::new(level, message, metadata))
    }

    /// Use an explicit timestamp instead of the creation time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn to_wire_record(&self) -> &WireRecord {
        self.wire.get_or_init(|| WireRecord {
            name: self.identity.name.clone(),
            hostname: hostname().to_string(),
            pid: std::process::id(),
            component: self.identity.component.clone(),
            level: self.level,
            msg: self.message.clone(),
            time: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            src: self.identity.src.clone(),
            v: WIRE_VERSION,
            fields: self.metadata.clone(),
        })
    }

    /// Compact JSON encoding of [`Self::to_wire_record`].
    pub fn to_bytes(&self) -> Result<&[u8]> {
        let bytes = self
            .bytes
            .get_or_try_init(|| serde_json::to_vec(self.to_wire_record()))?;
        Ok(bytes.as_slice())
    }
}
