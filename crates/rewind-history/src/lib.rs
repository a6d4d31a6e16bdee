#![forbid(unsafe_code)]

//! Linear undo/redo history engine.
//!
//! This crate records reversible changes to a piece of state and lets the
//! state be moved backward (undo) and forward again (redo). Two recording
//! strategies share one cursor algorithm:
//!
//! - **Snapshots** (Memento style): every commit stores a full copy of the
//!   value. Undo/redo restore the copy at the new cursor.
//! - **Operations** (Command style): every execute stores an `apply`/`revert`
//!   pair. Undo reverts the entry at the cursor, redo applies the next one.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 HistoryManager<T, M>                        │
//! │                                                              │
//! │   entries: [e0, e1, e2, e3]        container: T              │
//! │                     ▲                                        │
//! │                  cursor = Some(2)                            │
//! │                                                              │
//! │   e0..=e2 applied (reflected in T)   e3 available for redo   │
//! └────────────────────────────────────────────────────────────┘
//!
//! commit/execute after undo  ──►  e3 dropped, new entry appended
//! ```
//!
//! # Quick Start
//!
//! ```
//! use rewind_history::{AddCmd, CommandHistory, SnapshotHistory, SubtractCmd};
//!
//! let mut text = SnapshotHistory::new(String::new());
//! text.commit("A".to_string());
//! text.commit("B".to_string());
//! assert!(text.undo());
//! assert_eq!(text.current_value(), "A");
//!
//! let mut calc = CommandHistory::new(0_i64);
//! calc.execute_cmd(AddCmd::new(10_i64));
//! calc.execute_cmd(SubtractCmd::new(5_i64));
//! assert!(calc.undo());
//! assert_eq!(*calc.current_value(), 10);
//! ```
//!
//! # Module Structure
//!
//! - [`container`]: the owned value being edited
//! - [`entry`]: history entry sum type and metadata
//! - [`history`]: the generic manager and its cursor algorithm
//! - [`snapshot`]: snapshot recording mode
//! - [`command`]: operation recording mode and built-in commands
//! - [`config`]: limits and loading
//! - [`error`]: error types

pub mod command;
pub mod config;
pub mod container;
pub mod entry;
pub mod error;
pub mod history;
pub mod snapshot;

pub use command::{AddCmd, CommandBatch, CommandHistory, ReplaceCmd, Reversible, SubtractCmd};
pub use config::HistoryConfig;
pub use container::StateContainer;
pub use entry::{EntryMetadata, EntrySource, HistoryEntry, OperationEntry, SnapshotEntry};
pub use error::ConfigError;
pub use history::{
    HistoryManager, HistoryStatus, Operations, RecordingMode, Replay, Snapshots,
};
pub use snapshot::SnapshotHistory;
