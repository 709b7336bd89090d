//! Bounded history of returned beats.
//!
//! Keeps the most recent beats first. Once full, each push evicts the
//! oldest entry. Membership is structural equality, not identity.

use std::collections::VecDeque;

use crate::schema::Beat;

/// Default number of remembered beats.
pub const DEFAULT_HISTORY_CAPACITY: usize = 24;

/// Most-recent-first buffer of previously returned beats.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Beat>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    /// Create a buffer holding at most `capacity` beats.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the head, evicting the oldest entry when full.
    pub fn push(&mut self, beat: Beat) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(beat);
    }

    /// Whether a structurally equal beat is remembered.
    pub fn contains(&self, beat: &Beat) -> bool {
        self.entries.iter().any(|e| e == beat)
    }

    /// Remembered beats, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Beat> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
