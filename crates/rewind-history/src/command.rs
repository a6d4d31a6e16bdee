#![forbid(unsafe_code)]

//! Operation (Command) recording mode.
//!
//! Every [`execute`](CommandHistory::execute) applies an [`OperationEntry`]
//! to the current value and records it. Undo calls `revert` on the entry at
//! the cursor, redo calls `apply` on the next one, so reverts always run in
//! reverse order of application and re-applies in forward order.
//!
//! Commands can be written as closure pairs or as types implementing
//! [`Reversible`]. Built-ins:
//!
//! - [`AddCmd`] / [`SubtractCmd`]: arithmetic deltas
//! - [`ReplaceCmd`]: whole-value replacement remembering the prior value
//! - [`CommandBatch`]: several operations as one history entry
//!
//! # Invariants
//!
//! - `execute(op)` followed by `undo()` restores the prior value exactly,
//!   provided `op.revert` is the inverse of `op.apply`.
//! - `undo()` followed by `redo()` restores the executed value exactly.
//!
//! # Failure Modes
//!
//! - **Inexact inverse**: a `revert` that does not undo `apply` (including
//!   float rounding or integer overflow in an arithmetic command) leaves the
//!   value silently wrong. The engine cannot detect it.

use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::sync::Arc;

use crate::entry::{HistoryEntry, OperationEntry};
use crate::history::{HistoryManager, Operations};

/// A history that records reversible operations.
pub type CommandHistory<T> = HistoryManager<T, Operations>;

impl<T> HistoryManager<T, Operations> {
    /// Apply `op` to the current value and record it.
    ///
    /// Entries after the cursor are dropped first.
    pub fn execute(&mut self, op: OperationEntry<T>) {
        op.apply(self.value_mut());
        self.record(HistoryEntry::Operation(op));
    }

    /// Apply and record a typed command.
    pub fn execute_cmd<C: Reversible<T>>(&mut self, cmd: C)
    where
        T: 'static,
    {
        self.execute(cmd.into_entry());
    }
}

/// A reversible change to a value of type `T`.
///
/// `revert` must exactly undo `apply` for any value `apply` was given.
pub trait Reversible<T>: Send + Sync + 'static {
    /// Move `value` forward.
    fn apply(&self, value: &mut T);

    /// Move `value` back to what it was before `apply`.
    fn revert(&self, value: &mut T);

    /// Human-readable label for history menus.
    fn label(&self) -> String;

    /// Wrap into an operation entry.
    fn into_entry(self) -> OperationEntry<T>
    where
        Self: Sized,
        T: 'static,
    {
        let label = self.label();
        let forward = Arc::new(self);
        let backward = Arc::clone(&forward);
        OperationEntry::new(
            label,
            move |value: &mut T| forward.apply(value),
            move |value: &mut T| backward.revert(value),
        )
    }
}

// ============================================================================
// Arithmetic Commands
// ============================================================================

/// Adds a fixed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddCmd<V>(pub V);

impl<V> AddCmd<V> {
    /// Create a command adding `amount`.
    #[must_use]
    pub const fn new(amount: V) -> Self {
        Self(amount)
    }
}

impl<T, V> Reversible<T> for AddCmd<V>
where
    T: AddAssign<V> + SubAssign<V>,
    V: Copy + fmt::Display + Send + Sync + 'static,
{
    fn apply(&self, value: &mut T) {
        *value += self.0;
    }

    fn revert(&self, value: &mut T) {
        *value -= self.0;
    }

    fn label(&self) -> String {
        format!("Add {}", self.0)
    }
}

/// Subtracts a fixed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtractCmd<V>(pub V);

impl<V> SubtractCmd<V> {
    /// Create a command subtracting `amount`.
    #[must_use]
    pub const fn new(amount: V) -> Self {
        Self(amount)
    }
}

impl<T, V> Reversible<T> for SubtractCmd<V>
where
    T: AddAssign<V> + SubAssign<V>,
    V: Copy + fmt::Display + Send + Sync + 'static,
{
    fn apply(&self, value: &mut T) {
        *value -= self.0;
    }

    fn revert(&self, value: &mut T) {
        *value += self.0;
    }

    fn label(&self) -> String {
        format!("Subtract {}", self.0)
    }
}

// ============================================================================
// Replacement
// ============================================================================

/// Replaces the whole value, remembering what it replaced.
///
/// The prior value is captured when the command is built, so the command
/// is only an exact inverse if it is executed against that value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceCmd<T> {
    from: T,
    to: T,
    label: String,
}

impl<T> ReplaceCmd<T> {
    /// Create a command replacing `from` with `to`.
    #[must_use]
    pub fn new(from: T, to: T) -> Self {
        Self {
            from,
            to,
            label: "Replace".to_string(),
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl<T: Clone + Send + Sync + 'static> Reversible<T> for ReplaceCmd<T> {
    fn apply(&self, value: &mut T) {
        value.clone_from(&self.to);
    }

    fn revert(&self, value: &mut T) {
        value.clone_from(&self.from);
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Several operations recorded as one entry.
///
/// Applied in insertion order, reverted in reverse order.
pub struct CommandBatch<T> {
    /// Operations in application order.
    ops: Vec<OperationEntry<T>>,
    label: String,
}

impl<T> fmt::Debug for CommandBatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBatch")
            .field("label", &self.label)
            .field("ops", &self.ops)
            .finish()
    }
}

impl<T> CommandBatch<T> {
    /// Create an empty batch.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            ops: Vec::new(),
            label: label.into(),
        }
    }

    /// Add an operation.
    pub fn push(&mut self, op: OperationEntry<T>) {
        self.ops.push(op);
    }

    /// Add a typed command.
    #[must_use]
    pub fn with<C: Reversible<T>>(mut self, cmd: C) -> Self
    where
        T: 'static,
    {
        self.ops.push(cmd.into_entry());
        self
    }

    /// Number of operations in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<T: 'static> Reversible<T> for CommandBatch<T> {
    fn apply(&self, value: &mut T) {
        for op in &self.ops {
            op.apply(value);
        }
    }

    fn revert(&self, value: &mut T) {
        for op in self.ops.iter().rev() {
            op.revert(value);
        }
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
