#![forbid(unsafe_code)]

//! The history manager and its cursor algorithm.
//!
//! [`HistoryManager`] keeps one ordered list of entries and a cursor into it.
//! Both recording modes share this type; the mode only decides which kind of
//! entry can be recorded (see [`Snapshots`] and [`Operations`]).
//!
//! # Invariants
//!
//! 1. `cursor` is `None` (nothing applied) or `Some(i)` with `i < len`.
//! 2. Entries `0..=cursor` are applied: their effect is in the current value.
//!    Entries after the cursor are available for redo and are not applied.
//! 3. Recording a new entry first drops every entry after the cursor, then
//!    appends and moves the cursor onto the new entry. There is no branching.
//! 4. `len <= max(config.max_depth, 1)` after any operation. A zero limit
//!    still keeps the newest entry.
//!
//! # Cursor Movement
//!
//! ```text
//! commit(A) commit(B) commit(C)
//! ┌──────────────────────────────────────┐
//! │ entries: [A, B, C]    cursor: 2      │
//! └──────────────────────────────────────┘
//!
//! undo() x1
//! ┌──────────────────────────────────────┐
//! │ entries: [A, B, C]    cursor: 1      │
//! │                  ▲ redo-able         │
//! └──────────────────────────────────────┘
//!
//! commit(D)  <-- C dropped
//! ┌──────────────────────────────────────┐
//! │ entries: [A, B, D]    cursor: 2      │
//! └──────────────────────────────────────┘
//! ```
//!
//! # Boundaries
//!
//! Undo and redo at a boundary are no-ops returning `false`. The lower
//! boundary depends on the entry at the cursor: a snapshot at index 0 has
//! nothing earlier to restore, while an operation at index 0 can still be
//! reverted back to the pre-history value.

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use crate::config::HistoryConfig;
use crate::container::StateContainer;
use crate::entry::{HistoryEntry, SnapshotEntry};

const TARGET: &str = "rewind.history";

mod sealed {
    pub trait Sealed {}
}

/// Which kind of entry a manager records.
///
/// Implemented only by [`Snapshots`] and [`Operations`].
pub trait RecordingMode: sealed::Sealed {
    /// Short name used in logs.
    const NAME: &'static str;
}

/// Whole-value snapshot recording (Memento style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshots;

/// Forward/inverse operation recording (Command style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operations;

impl sealed::Sealed for Snapshots {}
impl sealed::Sealed for Operations {}

impl RecordingMode for Snapshots {
    const NAME: &'static str = "snapshot";
}

impl RecordingMode for Operations {
    const NAME: &'static str = "operation";
}

/// How a mode puts a recorded snapshot back into the container.
///
/// Only snapshot restore copies a value, so only [`Snapshots`] asks for
/// `T: Clone`. An operation history never holds a snapshot entry and can
/// undo and redo any `T`.
pub trait Replay<T>: RecordingMode {
    /// The value to restore from `snapshot`, `None` if this mode does not
    /// restore snapshots.
    fn restore(snapshot: &SnapshotEntry<T>) -> Option<T>;
}

impl<T: Clone> Replay<T> for Snapshots {
    fn restore(snapshot: &SnapshotEntry<T>) -> Option<T> {
        Some(T::clone(snapshot.value()))
    }
}

impl<T> Replay<T> for Operations {
    fn restore(_snapshot: &SnapshotEntry<T>) -> Option<T> {
        None
    }
}

/// Point-in-time view of a manager's position, for enabling UI controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryStatus {
    /// Index of the most recently applied entry.
    pub cursor: Option<usize>,
    /// Number of entries.
    pub len: usize,
    /// Whether `undo()` would move.
    pub can_undo: bool,
    /// Whether `redo()` would move.
    pub can_redo: bool,
}

/// Linear undo/redo history over a value of type `T`.
///
/// Owns the [`StateContainer`] and the entry list exclusively; neither can be
/// mutated except through `commit`/`execute`, `undo`, `redo` and the other
/// methods below.
pub struct HistoryManager<T, M: RecordingMode> {
    /// The value being edited.
    container: StateContainer<T>,
    /// All entries in insertion order.
    entries: VecDeque<HistoryEntry<T>>,
    /// Number of applied entries (`cursor + 1`).
    applied: usize,
    /// Limits.
    config: HistoryConfig,
    _mode: PhantomData<M>,
}

impl<T, M: RecordingMode> fmt::Debug for HistoryManager<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("mode", &M::NAME)
            .field("cursor", &self.cursor())
            .field("len", &self.entries.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Default, M: RecordingMode> Default for HistoryManager<T, M> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, M: RecordingMode> HistoryManager<T, M> {
    /// Create an empty history over `initial` with default configuration.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    /// Create an empty history over `initial` with the given configuration.
    #[must_use]
    pub fn with_config(initial: T, config: HistoryConfig) -> Self {
        Self {
            container: StateContainer::new(initial),
            entries: VecDeque::new(),
            applied: 0,
            config,
            _mode: PhantomData,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current value.
    #[must_use]
    pub fn current_value(&self) -> &T {
        self.container.value()
    }

    /// The container holding the current value.
    #[must_use]
    pub fn container(&self) -> &StateContainer<T> {
        &self.container
    }

    /// Consume the manager, returning the current value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.container.into_inner()
    }

    /// Index of the most recently applied entry, `None` if none is applied.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Number of entries, applied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.iter()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry<T>> {
        self.entries.get(index)
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor().is_some_and(|c| self.is_undoable(c))
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Position summary for UI enable/disable.
    #[must_use]
    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            cursor: self.cursor(),
            len: self.len(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Labels of entries that undo would step over (most recent first).
    pub fn undo_labels(&self, limit: usize) -> Vec<&str> {
        self.entries
            .iter()
            .enumerate()
            .take(self.applied)
            .rev()
            .filter(|(i, _)| self.is_undoable(*i))
            .take(limit)
            .map(|(_, e)| e.label())
            .collect()
    }

    /// Labels of entries that redo would step over (next first).
    pub fn redo_labels(&self, limit: usize) -> Vec<&str> {
        self.entries
            .iter()
            .skip(self.applied)
            .take(limit)
            .map(HistoryEntry::label)
            .collect()
    }

    /// Label of the entry the next undo would leave.
    #[must_use]
    pub fn next_undo_label(&self) -> Option<&str> {
        let cursor = self.cursor().filter(|c| self.is_undoable(*c))?;
        self.entries.get(cursor).map(HistoryEntry::label)
    }

    /// Label of the entry the next redo would apply.
    #[must_use]
    pub fn next_redo_label(&self) -> Option<&str> {
        self.entries.get(self.applied).map(HistoryEntry::label)
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Drop all entries. The current value is kept as is.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.applied = 0;
        tracing::debug!(target: TARGET, mode = M::NAME, dropped, "history cleared");
    }

    /// Whether the entry at `index` can be undone while it is at the cursor.
    fn is_undoable(&self, index: usize) -> bool {
        match self.entries.get(index) {
            Some(HistoryEntry::Snapshot(_)) => index > 0,
            Some(HistoryEntry::Operation(_)) => true,
            None => false,
        }
    }

    pub(crate) fn value_mut(&mut self) -> &mut T {
        self.container.value_mut()
    }

    /// Record an already-applied entry: drop the redo tail, append, advance
    /// the cursor, then evict the oldest entries beyond `max_depth`.
    pub(crate) fn record(&mut self, entry: HistoryEntry<T>) {
        let dropped = self.entries.len() - self.applied;
        if dropped > 0 {
            self.entries.truncate(self.applied);
            tracing::debug!(
                target: TARGET,
                mode = M::NAME,
                dropped,
                "redo entries truncated"
            );
        }

        let label = entry.label().to_owned();
        self.entries.push_back(entry);
        self.applied = self.entries.len();

        let evicted = self.enforce_depth();
        tracing::debug!(
            target: TARGET,
            mode = M::NAME,
            label = %label,
            cursor = self.applied - 1,
            len = self.entries.len(),
            evicted,
            "entry recorded"
        );
    }

    /// Evict the oldest entries until within the depth limit.
    fn enforce_depth(&mut self) -> usize {
        let max_depth = self.config.max_depth.max(1);
        let mut evicted = 0;
        while self.entries.len() > max_depth {
            if self.entries.pop_front().is_none() {
                break;
            }
            self.applied = self.applied.saturating_sub(1);
            evicted += 1;
        }
        evicted
    }
}

impl<T, M: Replay<T>> HistoryManager<T, M> {
    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Step back one entry.
    ///
    /// A snapshot at the cursor restores the previous snapshot; an operation
    /// at the cursor is reverted. Returns `false` (and changes nothing) when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(cursor) = self.cursor() else {
            tracing::trace!(target: TARGET, mode = M::NAME, "undo at lower bound");
            return false;
        };

        match &self.entries[cursor] {
            HistoryEntry::Snapshot(_) => {
                if cursor == 0 {
                    tracing::trace!(target: TARGET, mode = M::NAME, "undo at oldest snapshot");
                    return false;
                }
                if let HistoryEntry::Snapshot(prev) = &self.entries[cursor - 1] {
                    if let Some(value) = M::restore(prev) {
                        self.container.set_value(value);
                    }
                }
            }
            HistoryEntry::Operation(op) => {
                op.revert(self.container.value_mut());
            }
        }
        self.applied = cursor;

        tracing::debug!(
            target: TARGET,
            mode = M::NAME,
            label = self.entries[cursor].label(),
            cursor = ?self.cursor(),
            "undo"
        );
        true
    }

    /// Step forward one entry.
    ///
    /// The entry after the cursor is restored (snapshot) or applied
    /// (operation). Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let next = self.applied;
        let Some(entry) = self.entries.get(next) else {
            tracing::trace!(target: TARGET, mode = M::NAME, "redo at upper bound");
            return false;
        };

        match entry {
            HistoryEntry::Snapshot(snapshot) => {
                if let Some(value) = M::restore(snapshot) {
                    self.container.set_value(value);
                }
            }
            HistoryEntry::Operation(op) => {
                op.apply(self.container.value_mut());
            }
        }
        self.applied = next + 1;

        tracing::debug!(
            target: TARGET,
            mode = M::NAME,
            label = self.entries[next].label(),
            cursor = next,
            "redo"
        );
        true
    }

    /// Move the cursor to `target` one step at a time.
    ///
    /// `None` means "no entries applied". Targets that cannot be reached
    /// clamp to the nearest reachable position: past the end clamps to the
    /// newest entry, and in snapshot mode nothing goes below index 0.
    /// Returns the number of steps taken.
    pub fn go_to(&mut self, target: Option<usize>) -> usize {
        let target_applied = target.map_or(0, |i| i.saturating_add(1).min(self.entries.len()));
        let mut steps = 0;
        while self.applied > target_applied && self.undo() {
            steps += 1;
        }
        while self.applied < target_applied && self.redo() {
            steps += 1;
        }
        steps
    }
}

// ============================================================================
// Tests
// ============================================================================
