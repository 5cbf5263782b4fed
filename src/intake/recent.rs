//! Recent-query cache

use std::collections::VecDeque;

pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Most-recent-first list of distinct submitted queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentQueries {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for RecentQueries {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentQueries {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a submitted query
    ///
    /// An existing entry moves to the front instead of being duplicated, and
    /// the oldest entries fall off past capacity. Returns false when nothing
    /// changed (empty query, or already the most recent entry).
    pub fn push(&mut self, query: &str) -> bool {
        if query.is_empty() || self.capacity == 0 {
            return false;
        }
        if self.entries.front().map(String::as_str) == Some(query) {
            return false;
        }

        if let Some(pos) = self.entries.iter().position(|q| q == query) {
            self.entries.remove(pos);
        }
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.capacity);

        true
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    #[cfg(test)]
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
