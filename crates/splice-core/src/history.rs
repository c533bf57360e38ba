//! # History Manager
//!
//! Linear undo/redo over full-state snapshots.
//!
//! The stack always holds at least the baseline entry captured when the session was
//! created, and `index` points at the entry matching the live state. Recording after an
//! undo discards every entry above `index`.
//!
//! ```ignore
//! history.record("Delete layer", Snapshot::capture(&composition, current_time));
//! if let Some(prev) = history.undo() {
//!     composition = prev.composition.clone();
//! }
//! ```

use crate::timeline::Composition;
use tracing::debug;

/// Immutable capture of the editable state.
///
/// Cloning a `Composition` clones `Arc`s, so unchanged layers are shared between
/// snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub composition: Composition,
    pub current_time: f64,
}

impl Snapshot {
    pub fn capture(composition: &Composition, current_time: f64) -> Self {
        Self {
            composition: composition.clone(),
            current_time,
        }
    }
}

#[derive(Clone, Debug)]
struct HistoryEntry {
    label: String,
    snapshot: Snapshot,
}

pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    index: usize,
    /// Maximum number of entries kept, baseline included.
    limit: Option<usize>,
}

impl HistoryManager {
    /// Creates a history whose baseline is `initial`.
    pub fn new(initial: Snapshot, limit: Option<usize>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: "Initial state".to_string(),
                snapshot: initial,
            }],
            index: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Records the state reached by a mutation.
    pub fn record(&mut self, label: &str, snapshot: Snapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });
        self.index = self.entries.len() - 1;

        if let Some(limit) = self.limit {
            let overflow = self.entries.len().saturating_sub(limit);
            if overflow > 0 {
                self.entries.drain(..overflow);
                self.index -= overflow;
            }
        }

        debug!(label, depth = self.entries.len(), index = self.index, "History entry recorded");
    }

    /// Steps back one entry and returns the state to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        debug!(label = %self.entries[self.index].label, "Undo");
        self.index -= 1;
        Some(&self.entries[self.index].snapshot)
    }

    /// Steps forward one entry and returns the state to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        debug!(label = %self.entries[self.index].label, "Redo");
        Some(&self.entries[self.index].snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Label of the entry the next `undo` would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.entries[self.index].label.as_str())
    }

    /// Label of the entry the next `redo` would re-apply.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.index + 1)
            .map(|e| e.label.as_str())
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.index].snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(duration: f64) -> Snapshot {
        Snapshot {
            composition: Composition {
                layers: Vec::new(),
                duration,
            },
            current_time: 0.0,
        }
    }

    #[test]
    fn baseline_cannot_be_undone() {
        let mut h = HistoryManager::new(snap(0.0), None);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.undo().is_none());
    }

    #[test]
    fn undo_redo_walks_the_stack() {
        let mut h = HistoryManager::new(snap(0.0), None);
        h.record("a", snap(1.0));
        h.record("b", snap(2.0));
        assert_eq!(h.undo_label(), Some("b"));

        assert_eq!(h.undo().map(|s| s.composition.duration), Some(1.0));
        assert_eq!(h.undo().map(|s| s.composition.duration), Some(0.0));
        assert!(h.undo().is_none());
        assert_eq!(h.redo_label(), Some("a"));
        assert_eq!(h.redo().map(|s| s.composition.duration), Some(1.0));
        assert_eq!(h.redo().map(|s| s.composition.duration), Some(2.0));
        assert!(h.redo().is_none());
    }

    #[test]
    fn recording_after_undo_truncates_redo() {
        let mut h = HistoryManager::new(snap(0.0), None);
        h.record("a", snap(1.0));
        h.record("b", snap(2.0));
        h.undo();
        h.record("c", snap(3.0));
        assert!(!h.can_redo());
        assert_eq!(h.len(), 3);
        assert_eq!(h.current().composition.duration, 3.0);
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut h = HistoryManager::new(snap(0.0), Some(3));
        for i in 1..=5 {
            h.record("step", snap(i as f64));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), 2);
        h.undo();
        h.undo();
        assert!(!h.can_undo());
        assert_eq!(h.current().composition.duration, 3.0);
    }
}
