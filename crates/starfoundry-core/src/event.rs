//! Bounded, newest-first log of player-visible events.
//!
//! The log keeps at most [`MAX_LOG_ENTRIES`] entries; pushing past the
//! bound silently drops the oldest. Serialized newest-first, matching the
//! persisted snapshot layout.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Upper bound on retained entries.
pub const MAX_LOG_ENTRIES: usize = 8;

/// A single log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    /// Epoch milliseconds at which the event occurred.
    pub timestamp: i64,
}

/// The bounded event log. Front is newest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry, dropping the oldest past the bound.
    pub fn push(&mut self, message: impl Into<String>, timestamp: i64) {
        self.entries.push_front(LogEntry {
            message: message.into(),
            timestamp,
        });
        self.entries.truncate(MAX_LOG_ENTRIES);
    }

    /// Replace contents from a restored snapshot, truncated to the bound.
    pub fn restore(&mut self, entries: Vec<LogEntry>) {
        self.entries = entries.into_iter().take(MAX_LOG_ENTRIES).collect();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_is_newest_first() {
        let mut log = EventLog::new();
        log.push("first", 1);
        log.push("second", 2);
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert_eq!(log.newest().unwrap().timestamp, 2);
    }

    #[test]
    fn oldest_dropped_past_bound() {
        let mut log = EventLog::new();
        for i in 0..(MAX_LOG_ENTRIES as i64 + 3) {
            log.push(format!("event {i}"), i);
        }
        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        // Newest survives, earliest three are gone.
        assert_eq!(log.newest().unwrap().message, "event 10");
        assert!(log.entries().all(|e| e.timestamp >= 3));
    }

    #[test]
    fn restore_truncates() {
        let entries: Vec<_> = (0..20)
            .map(|i| LogEntry {
                message: format!("e{i}"),
                timestamp: i,
            })
            .collect();
        let mut log = EventLog::new();
        log.restore(entries);
        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        // Truncation keeps the head of the restored sequence (the newest).
        assert_eq!(log.newest().unwrap().message, "e0");
    }

    #[test]
    fn serde_is_transparent_sequence() {
        let mut log = EventLog::new();
        log.push("hello", 42);
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        let back: EventLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn clear_empties() {
        let mut log = EventLog::new();
        log.push("x", 0);
        log.clear();
        assert!(log.is_empty());
    }
}
