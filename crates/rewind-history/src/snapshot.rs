#![forbid(unsafe_code)]

//! Snapshot (Memento) recording mode.
//!
//! Every [`commit`](SnapshotHistory::commit) stores a full copy of the value.
//! Copies are held as [`Arc<T>`], so [`commit_arc`](SnapshotHistory::commit_arc)
//! can record a value that is already shared without another allocation.
//! When `T` uses persistent collections, successive snapshots share most of
//! their memory.
//!
//! # Baseline
//!
//! The value a history is created with is not an entry. Undo stops at the
//! oldest committed snapshot, so an application that wants to return to the
//! starting value should create the history with
//! [`with_baseline`](SnapshotHistory::with_baseline), which commits it as
//! entry 0.
//!
//! # Example
//!
//! ```
//! use rewind_history::SnapshotHistory;
//!
//! let mut h = SnapshotHistory::new(String::new());
//! h.commit("A".to_string());
//! h.commit("B".to_string());
//! h.undo();
//! h.commit("C".to_string());
//!
//! let values: Vec<&str> = h.values().map(String::as_str).collect();
//! assert_eq!(values, ["A", "C"]);
//! assert!(!h.redo());
//! ```

use std::sync::Arc;

use crate::config::HistoryConfig;
use crate::entry::{EntryMetadata, HistoryEntry, SnapshotEntry};
use crate::history::{HistoryManager, Snapshots};

/// A history that records whole-value snapshots.
pub type SnapshotHistory<T> = HistoryManager<T, Snapshots>;

impl<T: Clone> HistoryManager<T, Snapshots> {
    /// Create a history whose entry 0 is `initial`.
    #[must_use]
    pub fn with_baseline(initial: T) -> Self {
        Self::with_baseline_and_config(initial, HistoryConfig::default())
    }

    /// Create a history whose entry 0 is `initial`, with the given limits.
    #[must_use]
    pub fn with_baseline_and_config(initial: T, config: HistoryConfig) -> Self {
        let mut history = Self::with_config(initial.clone(), config);
        history.commit_labeled(initial, "Initial");
        history
    }

    /// Make `value` current and record it as a new snapshot.
    ///
    /// Entries after the cursor are dropped first. Identical consecutive
    /// values are recorded as separate entries; see
    /// [`commit_if_changed`](Self::commit_if_changed) to skip them.
    pub fn commit(&mut self, value: T) {
        self.commit_labeled(value, SnapshotEntry::<T>::DEFAULT_LABEL);
    }

    /// [`commit`](Self::commit) with a label for history menus.
    pub fn commit_labeled(&mut self, value: T, label: impl Into<String>) {
        let shared = Arc::new(value.clone());
        self.commit_entry(SnapshotEntry::new(shared, EntryMetadata::new(label)), value);
    }

    /// Record a pre-wrapped snapshot without copying it into a new `Arc`.
    pub fn commit_arc(&mut self, value: Arc<T>) {
        let current = T::clone(&value);
        self.commit_entry(
            SnapshotEntry::new(value, EntryMetadata::new(SnapshotEntry::<T>::DEFAULT_LABEL)),
            current,
        );
    }

    /// Record a fully built snapshot entry (custom metadata or source).
    pub fn commit_snapshot(&mut self, entry: SnapshotEntry<T>) {
        let current = T::clone(entry.value());
        self.commit_entry(entry, current);
    }

    fn commit_entry(&mut self, entry: SnapshotEntry<T>, current: T) {
        self.record(HistoryEntry::Snapshot(entry));
        *self.value_mut() = current;
    }
}

impl<T> HistoryManager<T, Snapshots> {
    /// Captured values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries()
            .filter_map(HistoryEntry::as_snapshot)
            .map(SnapshotEntry::value)
    }

    /// The snapshot at the cursor, `None` if nothing is committed.
    #[must_use]
    pub fn current_snapshot(&self) -> Option<&Arc<T>> {
        let cursor = self.cursor()?;
        self.get(cursor)
            .and_then(HistoryEntry::as_snapshot)
            .map(SnapshotEntry::shared)
    }
}

impl<T: Clone + PartialEq> HistoryManager<T, Snapshots> {
    /// Commit `value` unless it equals the snapshot at the cursor.
    ///
    /// Returns whether an entry was recorded. With an empty history the
    /// value is always recorded.
    pub fn commit_if_changed(&mut self, value: T) -> bool {
        self.commit_labeled_if_changed(value, SnapshotEntry::<T>::DEFAULT_LABEL)
    }

    /// [`commit_if_changed`](Self::commit_if_changed) with a label.
    pub fn commit_labeled_if_changed(&mut self, value: T, label: impl Into<String>) -> bool {
        if self.current_snapshot().is_some_and(|s| **s == value) {
            tracing::trace!(target: "rewind.history", "commit skipped, value unchanged");
            return false;
        }
        self.commit_labeled(value, label);
        true
    }
}

/// Persistent collections for snapshot values.
///
/// Cloning an `im` collection is O(1) and a modified clone shares all
/// untouched nodes with its source, so a history of large maps or vectors
/// stores only the differences between snapshots.
///
/// ```ignore
/// use rewind_history::SnapshotHistory;
/// use rewind_history::snapshot::persistent::Vector;
///
/// let mut lines: SnapshotHistory<Vector<String>> = SnapshotHistory::new(Vector::new());
/// let mut next = lines.current_value().clone();
/// next.push_back("first".to_string());
/// lines.commit(next);
/// ```
#[cfg(feature = "hamt")]
pub mod persistent {
    pub use im::{HashMap, HashSet, OrdMap, OrdSet, Vector};
}

// ============================================================================
// Tests
// ============================================================================
