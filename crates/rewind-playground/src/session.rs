//! Text-box and calculator sessions.
//!
//! Each session owns one history and turns a [`ScriptCommand`] into a
//! [`Reply`] describing the value and position afterwards. Navigation
//! commands behave the same in both modes; only how a new value is recorded
//! differs.

use serde::Serialize;

use rewind_history::{
    AddCmd, CommandHistory, HistoryConfig, HistoryManager, HistoryStatus,
    RecordingMode, Replay, ReplaceCmd, SnapshotHistory, SubtractCmd,
};

use crate::error::{PlaygroundError, Result};
use crate::script::{ScriptCommand, parse_int};

/// One row of a `history` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub index: usize,
    pub label: String,
    pub current: bool,
}

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub command: &'static str,
    /// Whether the command recorded an entry or moved the cursor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
    pub value: serde_json::Value,
    pub status: HistoryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryView>>,
}

impl Reply {
    fn from_history<T: Serialize, M: RecordingMode>(
        command: &ScriptCommand,
        history: &HistoryManager<T, M>,
        changed: Option<bool>,
    ) -> Result<Self> {
        Ok(Self {
            command: command.name(),
            changed,
            value: serde_json::to_value(history.current_value())?,
            status: history.status(),
            entries: None,
        })
    }

    /// Human-readable rendering.
    #[must_use]
    pub fn to_text(&self) -> String {
        if let Some(entries) = &self.entries {
            if entries.is_empty() {
                return "(no entries)".to_string();
            }
            return entries
                .iter()
                .map(|e| {
                    let marker = if e.current { '>' } else { ' ' };
                    format!("{marker} {:>3}  {}", e.index, e.label)
                })
                .collect::<Vec<_>>()
                .join("\n");
        }

        let cursor = self
            .status
            .cursor
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let mut line = format!(
            "{} [{}/{}]",
            self.value, cursor, self.status.len
        );
        if self.command == "status" {
            line.push_str(&format!(
                " undo={} redo={}",
                self.status.can_undo, self.status.can_redo
            ));
        }
        if self.changed == Some(false) {
            line.push_str(" (unchanged)");
        }
        line
    }
}

/// A history-backed session driven by script commands.
pub trait Session {
    /// Mode name used in messages.
    fn mode(&self) -> &'static str;

    /// Run one command. `quit` is handled by the caller.
    fn execute(&mut self, command: &ScriptCommand) -> Result<Reply>;
}

/// Commands that mean the same thing in every mode.
///
/// Returns `Ok(None)` when the command is mode-specific.
fn navigate<T, M>(
    history: &mut HistoryManager<T, M>,
    command: &ScriptCommand,
) -> Result<Option<Reply>>
where
    T: Serialize,
    M: Replay<T>,
{
    let changed = match command {
        ScriptCommand::Undo(n) => Some(repeat(*n, || history.undo()) > 0),
        ScriptCommand::Redo(n) => Some(repeat(*n, || history.redo()) > 0),
        ScriptCommand::GoTo(target) => Some(history.go_to(*target) > 0),
        ScriptCommand::Clear => {
            let had_entries = !history.is_empty();
            history.clear();
            Some(had_entries)
        }
        ScriptCommand::Show | ScriptCommand::Status => None,
        ScriptCommand::History => {
            let mut reply = Reply::from_history(command, history, None)?;
            reply.entries = Some(entry_views(history));
            return Ok(Some(reply));
        }
        _ => return Ok(None),
    };
    Reply::from_history(command, history, changed).map(Some)
}

fn repeat(times: usize, mut step: impl FnMut() -> bool) -> usize {
    let mut moved = 0;
    while moved < times && step() {
        moved += 1;
    }
    moved
}

fn entry_views<T, M: RecordingMode>(history: &HistoryManager<T, M>) -> Vec<EntryView> {
    let cursor = history.cursor();
    history
        .entries()
        .enumerate()
        .map(|(index, entry)| EntryView {
            index,
            label: entry.label().to_string(),
            current: cursor == Some(index),
        })
        .collect()
}

fn unsupported(command: &ScriptCommand, mode: &'static str) -> PlaygroundError {
    PlaygroundError::Unsupported {
        command: command.name().to_string(),
        mode,
    }
}

// ============================================================================
// Memento (text box)
// ============================================================================

/// A text box whose every `set` is saved as a snapshot.
#[derive(Debug)]
pub struct MementoSession {
    history: SnapshotHistory<String>,
    dedupe: bool,
}

impl MementoSession {
    /// Create an empty text box.
    ///
    /// With `dedupe`, setting the text it already holds records nothing.
    #[must_use]
    pub fn new(config: HistoryConfig, dedupe: bool) -> Self {
        Self {
            history: SnapshotHistory::with_config(String::new(), config),
            dedupe,
        }
    }

    /// The underlying history.
    #[must_use]
    pub fn history(&self) -> &SnapshotHistory<String> {
        &self.history
    }
}

impl Session for MementoSession {
    fn mode(&self) -> &'static str {
        "memento"
    }

    fn execute(&mut self, command: &ScriptCommand) -> Result<Reply> {
        if let Some(reply) = navigate(&mut self.history, command)? {
            return Ok(reply);
        }
        match command {
            ScriptCommand::Set(text) => {
                let label = format!("Set {text:?}");
                let recorded = if self.dedupe {
                    self.history
                        .commit_labeled_if_changed(text.clone(), label)
                } else {
                    self.history.commit_labeled(text.clone(), label);
                    true
                };
                Reply::from_history(command, &self.history, Some(recorded))
            }
            other => Err(unsupported(other, self.mode())),
        }
    }
}

// ============================================================================
// Calculator
// ============================================================================

/// An integer accumulator whose every change is recorded as a command.
#[derive(Debug)]
pub struct CalculatorSession {
    history: CommandHistory<i64>,
}

impl CalculatorSession {
    /// Create an accumulator holding `start`.
    #[must_use]
    pub fn new(start: i64, config: HistoryConfig) -> Self {
        Self {
            history: CommandHistory::with_config(start, config),
        }
    }

    /// The underlying history.
    #[must_use]
    pub fn history(&self) -> &CommandHistory<i64> {
        &self.history
    }

    fn checked(&self, result: Option<i64>) -> Result<()> {
        match result {
            Some(_) => Ok(()),
            None => Err(PlaygroundError::invalid(format!(
                "result overflows from {}",
                self.history.current_value()
            ))),
        }
    }
}

impl Session for CalculatorSession {
    fn mode(&self) -> &'static str {
        "calculator"
    }

    fn execute(&mut self, command: &ScriptCommand) -> Result<Reply> {
        if let Some(reply) = navigate(&mut self.history, command)? {
            return Ok(reply);
        }
        let current = *self.history.current_value();
        match command {
            ScriptCommand::Add(n) => {
                self.checked(current.checked_add(*n))?;
                self.history.execute_cmd(AddCmd::new(*n));
            }
            ScriptCommand::Sub(n) => {
                self.checked(current.checked_sub(*n))?;
                self.history.execute_cmd(SubtractCmd::new(*n));
            }
            ScriptCommand::Set(text) => {
                let target = parse_int("set", text.trim()).map_err(PlaygroundError::invalid)?;
                self.history.execute_cmd(
                    ReplaceCmd::new(current, target).with_label(format!("Set {target}")),
                );
            }
            other => return Err(unsupported(other, self.mode())),
        }
        Reply::from_history(command, &self.history, Some(true))
    }
}
