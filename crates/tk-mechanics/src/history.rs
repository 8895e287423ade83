//! Bounded roll log, newest entry first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::resolution::Resolution;

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// One logged roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// What the roll was for.
    pub label: String,
    /// Final total.
    pub total: i64,
    /// Full trace line.
    pub trace: String,
}

impl HistoryEntry {
    /// Build an entry from a resolved roll.
    pub fn from_resolution(label: &str, resolution: &Resolution) -> Self {
        Self {
            label: label.to_string(),
            total: resolution.total,
            trace: resolution.trace(label),
        }
    }
}

/// A fixed-capacity log that evicts the oldest entry on overflow.
#[derive(Debug, Clone)]
pub struct RollHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl RollHistory {
    /// Create an empty log holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a roll as the newest entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: i64) -> HistoryEntry {
        HistoryEntry {
            label: format!("roll {n}"),
            total: n,
            trace: format!("roll {n} -> {n}"),
        }
    }

    #[test]
    fn newest_first() {
        let mut h = RollHistory::default();
        h.push(entry(1));
        h.push(entry(2));
        let totals: Vec<i64> = h.iter().map(|e| e.total).collect();
        assert_eq!(totals, vec![2, 1]);
        assert_eq!(h.latest().map(|e| e.total), Some(2));
    }

    #[test]
    fn evicts_oldest_on_overflow() {
        let mut h = RollHistory::new(3);
        for n in 1..=5 {
            h.push(entry(n));
        }
        assert_eq!(h.len(), 3);
        let totals: Vec<i64> = h.iter().map(|e| e.total).collect();
        assert_eq!(totals, vec![5, 4, 3]);
    }

    #[test]
    fn default_capacity_is_fifty() {
        let mut h = RollHistory::default();
        for n in 0..60 {
            h.push(entry(n));
        }
        assert_eq!(h.len(), DEFAULT_CAPACITY);
        assert_eq!(h.iter().last().map(|e| e.total), Some(10));
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut h = RollHistory::new(0);
        h.push(entry(1));
        h.push(entry(2));
        assert_eq!(h.len(), 1);
        h.clear();
        assert!(h.is_empty());
    }
}
