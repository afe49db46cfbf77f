//! Verbosity gate
//!
//! Decides, from three flags fixed at construction, whether a record at a
//! given level is written:
//!
//! | level          | written when |
//! |----------------|--------------|
//! | fatal, error   | always       |
//! | warn, info     | `enabled`    |
//! | access, debug  | `verbose`    |
//! | trace          | `trace`      |

use super::log_level::LogLevel;
use super::namespace::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment variable holding the debug selector.
pub const DEBUG_SELECTOR_VAR: &str = "NODE_DEBUG";

/// Environment variable enabling trace output for verbose namespaces.
pub const TRACE_VAR: &str = "TRACE";

/// Snapshot of the environment consulted when a logger is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn debug_selector(&self) -> &str {
        self.get(DEBUG_SELECTOR_VAR).unwrap_or("")
    }

    pub fn trace_flag(&self) -> bool {
        self.get(TRACE_VAR).is_some_and(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Caller-supplied gate flags. Unset flags fall back to defaults and the
/// environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateOptions {
    pub enabled: Option<bool>,
    pub verbose: Option<bool>,
    pub trace: Option<bool>,
}

/// Resolved gate flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    pub enabled: bool,
    pub verbose: bool,
    pub trace: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verbose: false,
            trace: false,
        }
    }
}

impl GateConfig {
    /// Resolve the flags for `namespace`.
    ///
    /// An explicit `verbose: false` does not override a selector match.
    /// `verbose` implies `enabled`.
    pub fn resolve(namespace: &Namespace, options: &GateOptions, env: &Environment) -> Self {
        let verbose =
            options.verbose.unwrap_or(false) || namespace.is_selected_by(env.debug_selector());
        let trace = options.trace.unwrap_or(verbose && env.trace_flag());
        let enabled = verbose || options.enabled.unwrap_or(true);

        Self {
            enabled,
            verbose,
            trace,
        }
    }

    pub fn should_emit(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Fatal | LogLevel::Error => true,
            LogLevel::Warn | LogLevel::Info => self.enabled,
            LogLevel::Access | LogLevel::Debug => self.verbose,
            LogLevel::Trace => self.trace,
        }
    }
}
