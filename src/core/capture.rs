//! Capture store for whitelisted records

use super::log_record::LogRecord;
use std::collections::HashMap;
use std::sync::Arc;

/// Append-only log of captured records with a per-message index.
#[derive(Debug, Default)]
pub struct CaptureStore {
    records: Vec<Arc<LogRecord>>,
    by_message: HashMap<String, Vec<Arc<LogRecord>>>,
}

impl CaptureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, record: Arc<LogRecord>) {
        self.by_message
            .entry(record.message().to_string())
            .or_default()
            .push(Arc::clone(&record));
        self.records.push(record);
    }

    /// Snapshot of every record captured so far, oldest first.
    pub fn items(&self) -> Vec<Arc<LogRecord>> {
        self.records.clone()
    }

    /// Drain the records captured for `message`.
    ///
    /// The global sequence returned by [`Self::items`] is left untouched.
    pub fn pop(&mut self, message: &str) -> Vec<Arc<LogRecord>> {
        self.by_message.remove(message).unwrap_or_default()
    }

    pub fn has_pending(&self) -> bool {
        !self.by_message.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    fn record(message: &str) -> Arc<LogRecord> {
        Arc::new(LogRecord::new(LogLevel::Error, message, None))
    }

    #[test]
    fn test_capture_keeps_insertion_order() {
        let mut store = CaptureStore::new();
        store.capture(record("a"));
        store.capture(record("b"));
        store.capture(record("a"));

        let messages: Vec<_> = store.items().iter().map(|r| r.message().to_string()).collect();
        assert_eq!(messages, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_pop_is_a_one_shot_drain() {
        let mut store = CaptureStore::new();
        store.capture(record("a"));
        store.capture(record("a"));
        store.capture(record("b"));

        assert_eq!(store.pop("a").len(), 2);
        assert!(store.pop("a").is_empty());
        assert!(store.has_pending());

        assert_eq!(store.pop("b").len(), 1);
        assert!(!store.has_pending());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_pop_shares_records_with_items() {
        let mut store = CaptureStore::new();
        store.capture(record("a"));
        let popped = store.pop("a");
        assert!(Arc::ptr_eq(&popped[0], &store.items()[0]));
    }
}
