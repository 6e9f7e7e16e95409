//! Player-facing game log: bounded, most recent entry first.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Styling class of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTone {
    Pos,
    Neg,
    Neutral,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic per-game sequence number.
    pub id: u64,
    pub text: String,
    pub tone: LogTone,
    /// Game-clock milliseconds at creation.
    pub timestamp_ms: u64,
}

/// Append-only log truncated to a fixed capacity.
///
/// Entries past the capacity are dropped from the old end; ids keep counting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl Journal {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    /// Prepend an entry, evicting the oldest past capacity. Returns its id.
    pub fn push(&mut self, text: impl Into<String>, tone: LogTone, timestamp_ms: u64) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push_front(LogEntry {
            id,
            text: text.into(),
            tone,
            timestamp_ms,
        });
        self.entries.truncate(self.capacity);
        id
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn contains_text(&self, text: &str) -> bool {
        self.entries.iter().any(|entry| entry.text == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_comes_first() {
        let mut journal = Journal::with_capacity(50);
        journal.push("first", LogTone::System, 0);
        journal.push("second", LogTone::Neg, 10);
        let texts: Vec<_> = journal.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(journal.latest().map(|entry| entry.tone), Some(LogTone::Neg));
    }

    #[test]
    fn fifty_first_entry_evicts_oldest() {
        let mut journal = Journal::with_capacity(50);
        for idx in 0..51 {
            journal.push(format!("entry {idx}"), LogTone::Neutral, idx);
        }
        assert_eq!(journal.len(), 50);
        assert!(!journal.contains_text("entry 0"));
        assert!(journal.contains_text("entry 1"));
        assert_eq!(journal.latest().map(|entry| entry.id), Some(50));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut journal = Journal::with_capacity(0);
        journal.push("a", LogTone::Neutral, 0);
        journal.push("b", LogTone::Neutral, 0);
        assert_eq!(journal.capacity(), 1);
        assert_eq!(journal.len(), 1);
    }
}
