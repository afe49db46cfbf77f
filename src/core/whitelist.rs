//! Per-level message suppression

use super::log_level::LogLevel;
use std::collections::{HashMap, HashSet};

/// Messages that are captured instead of written, keyed by level.
#[derive(Debug, Default)]
pub struct WhitelistTable {
    entries: HashMap<LogLevel, HashSet<String>>,
}

impl WhitelistTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, level: LogLevel, message: impl Into<String>) {
        self.entries.entry(level).or_default().insert(message.into());
    }

    pub fn remove(&mut self, level: LogLevel, message: &str) {
        if let Some(messages) = self.entries.get_mut(&level) {
            messages.remove(message);
            if messages.is_empty() {
                self.entries.remove(&level);
            }
        }
    }

    pub fn contains(&self, level: LogLevel, message: &str) -> bool {
        self.entries
            .get(&level)
            .is_some_and(|messages| messages.contains(message))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
