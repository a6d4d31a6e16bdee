#![forbid(unsafe_code)]

//! History entries.
//!
//! A [`HistoryEntry`] is one of two variants:
//!
//! - [`SnapshotEntry`]: an immutable copy of the whole value at commit time.
//! - [`OperationEntry`]: an `apply`/`revert` closure pair plus a label.
//!
//! The manager dispatches on the variant tag during undo/redo; entries never
//! see the cursor.
//!
//! # Caller Contract
//!
//! For an [`OperationEntry`], `revert` MUST exactly undo `apply` on the same
//! value. The engine only sequences the calls and cannot detect a pair that
//! is not a true inverse; the result of such a pair is silently wrong state.

use std::fmt;
use std::sync::Arc;

use web_time::Instant;

/// Who or what produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntrySource {
    /// Direct user action.
    #[default]
    User,
    /// Recorded by application code.
    Programmatic,
    /// Re-recorded from a script or macro.
    Replay,
}

/// Metadata attached to every entry for display and tracing.
#[derive(Debug, Clone)]
pub struct EntryMetadata {
    /// Human-readable label (e.g. "Add 10").
    pub label: String,
    /// When the entry was created.
    pub created_at: Instant,
    /// Who produced the entry.
    pub source: EntrySource,
}

impl EntryMetadata {
    /// Create metadata with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            created_at: Instant::now(),
            source: EntrySource::User,
        }
    }

    /// Set the entry source.
    #[must_use]
    pub fn with_source(mut self, source: EntrySource) -> Self {
        self.source = source;
        self
    }
}

impl Default for EntryMetadata {
    fn default() -> Self {
        Self::new(SnapshotEntry::<()>::DEFAULT_LABEL)
    }
}

/// An immutable copy of the value at commit time.
///
/// The copy is held in an [`Arc`], so entries that capture the same
/// allocation share it.
pub struct SnapshotEntry<T> {
    value: Arc<T>,
    metadata: EntryMetadata,
}

impl<T> SnapshotEntry<T> {
    /// Label used by [`commit`](crate::SnapshotHistory::commit).
    pub const DEFAULT_LABEL: &'static str = "Snapshot";

    /// Wrap a captured value.
    #[must_use]
    pub fn new(value: Arc<T>, metadata: EntryMetadata) -> Self {
        Self { value, metadata }
    }

    /// The captured value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The shared handle to the captured value.
    #[must_use]
    pub fn shared(&self) -> &Arc<T> {
        &self.value
    }

    /// Entry metadata.
    #[must_use]
    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }
}

impl<T: fmt::Debug> fmt::Debug for SnapshotEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotEntry")
            .field("value", &self.value)
            .field("label", &self.metadata.label)
            .finish()
    }
}

/// Callback type for moving a value forward or back.
pub type TransitionFn<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// A reversible change: a forward transition and its exact inverse.
///
/// Parameters the transitions need are captured by the closures when the
/// entry is built. Both closures receive the container's value from the
/// manager; neither holds its own handle to the state.
pub struct OperationEntry<T> {
    apply: TransitionFn<T>,
    revert: TransitionFn<T>,
    metadata: EntryMetadata,
}

impl<T> OperationEntry<T> {
    /// Build an entry from an `apply`/`revert` pair.
    pub fn new<A, R>(label: impl Into<String>, apply: A, revert: R) -> Self
    where
        A: Fn(&mut T) + Send + Sync + 'static,
        R: Fn(&mut T) + Send + Sync + 'static,
    {
        Self {
            apply: Box::new(apply),
            revert: Box::new(revert),
            metadata: EntryMetadata::new(label),
        }
    }

    /// Set the entry source.
    #[must_use]
    pub fn with_source(mut self, source: EntrySource) -> Self {
        self.metadata.source = source;
        self
    }

    /// Run the forward transition.
    pub fn apply(&self, value: &mut T) {
        (self.apply)(value);
    }

    /// Run the inverse transition.
    pub fn revert(&self, value: &mut T) {
        (self.revert)(value);
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.metadata.label
    }

    /// Entry metadata.
    #[must_use]
    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }
}

impl<T> fmt::Debug for OperationEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationEntry")
            .field("label", &self.metadata.label)
            .field("source", &self.metadata.source)
            .finish_non_exhaustive()
    }
}

/// One recorded step of history.
#[derive(Debug)]
pub enum HistoryEntry<T> {
    /// Whole-value copy (Memento style).
    Snapshot(SnapshotEntry<T>),
    /// Forward/inverse pair (Command style).
    Operation(OperationEntry<T>),
}

impl<T> HistoryEntry<T> {
    /// Entry metadata, regardless of variant.
    #[must_use]
    pub fn metadata(&self) -> &EntryMetadata {
        match self {
            Self::Snapshot(s) => s.metadata(),
            Self::Operation(op) => op.metadata(),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.metadata().label
    }

    /// The captured value, if this is a snapshot.
    #[must_use]
    pub fn as_snapshot(&self) -> Option<&SnapshotEntry<T>> {
        match self {
            Self::Snapshot(s) => Some(s),
            Self::Operation(_) => None,
        }
    }

    /// The operation, if this is one.
    #[must_use]
    pub fn as_operation(&self) -> Option<&OperationEntry<T>> {
        match self {
            Self::Snapshot(_) => None,
            Self::Operation(op) => Some(op),
        }
    }
}

impl<T> From<SnapshotEntry<T>> for HistoryEntry<T> {
    fn from(entry: SnapshotEntry<T>) -> Self {
        Self::Snapshot(entry)
    }
}

impl<T> From<OperationEntry<T>> for HistoryEntry<T> {
    fn from(entry: OperationEntry<T>) -> Self {
        Self::Operation(entry)
    }
}
