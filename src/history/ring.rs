use std::collections::VecDeque;

use log::debug;

use super::record::QueryRecord;

/// Bounded buffer of past operations. When full, the oldest record is evicted.
pub struct HistoryRing {
    entries: VecDeque<QueryRecord>,
    capacity: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `entry` unless the newest record has the same text.
    /// Returns whether the entry was stored.
    pub fn record(&mut self, entry: QueryRecord) -> bool {
        if self.entries.back().is_some_and(|last| last.text == entry.text) {
            return false;
        }
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!("history full, evicting '{}'", evicted.text);
            }
        }
        self.entries.push_back(entry);
        true
    }

    /// Newest first.
    pub fn list(&self) -> Vec<QueryRecord> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(crate::conf::HistoryConfig::DEFAULT_CAPACITY)
    }
}
