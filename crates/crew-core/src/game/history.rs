use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Bounded stack of earlier snapshots, owned by whoever drives the undo button.
///
/// Applying an undone snapshot makes the sync layer echo it back; the next
/// `save` after each `undo` is swallowed so that echo is not recorded again.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
    suppressed: usize,
}

impl<T: Clone> History<T> {
    /// Keeps at most `capacity` snapshots, never fewer than one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            suppressed: 0,
        }
    }

    pub fn save(&mut self, snapshot: T) {
        if self.suppressed > 0 {
            self.suppressed -= 1;
            return;
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Drops the newest snapshot and returns the one before it.
    pub fn undo(&mut self) -> Option<T> {
        self.entries.pop_back()?;
        self.suppressed += 1;
        self.entries.back().cloned()
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

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
