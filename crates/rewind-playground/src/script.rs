//! Line-oriented session commands.
//!
//! ```text
//! set <text>      replace the value (text box: rest of line after leading
//!                 whitespace, trailing kept; calculator: integer)
//! add <n>         add to the accumulator
//! sub <n>         subtract from the accumulator
//! undo [n]        step back n times (default 1)
//! redo [n]        step forward n times (default 1)
//! goto <i|none>   move the cursor to entry i, or before the first entry
//! show            print the current value
//! history         list entries, marking the cursor
//! status          print cursor, length and undo/redo availability
//! clear           drop all entries, keep the value
//! quit            stop reading
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Keywords are
//! case-insensitive.

use std::fmt;

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Set(String),
    Add(i64),
    Sub(i64),
    Undo(usize),
    Redo(usize),
    GoTo(Option<usize>),
    Show,
    History,
    Status,
    Clear,
    Quit,
}

impl ScriptCommand {
    /// Keyword that produced this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Add(_) => "add",
            Self::Sub(_) => "sub",
            Self::Undo(_) => "undo",
            Self::Redo(_) => "redo",
            Self::GoTo(_) => "goto",
            Self::Show => "show",
            Self::History => "history",
            Self::Status => "status",
            Self::Clear => "clear",
            Self::Quit => "quit",
        }
    }
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(text) => write!(f, "set {text}"),
            Self::Add(n) => write!(f, "add {n}"),
            Self::Sub(n) => write!(f, "sub {n}"),
            Self::Undo(n) => write!(f, "undo {n}"),
            Self::Redo(n) => write!(f, "redo {n}"),
            Self::GoTo(Some(i)) => write!(f, "goto {i}"),
            Self::GoTo(None) => f.write_str("goto none"),
            other => f.write_str(other.name()),
        }
    }
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest),
        None => (trimmed, ""),
    };
    let keyword = keyword.to_ascii_lowercase();
    let arg = rest.trim();

    let command = match keyword.as_str() {
        "set" => ScriptCommand::Set(rest.trim_start().to_string()),
        "add" => ScriptCommand::Add(parse_int(&keyword, arg)?),
        "sub" => ScriptCommand::Sub(parse_int(&keyword, arg)?),
        "undo" => ScriptCommand::Undo(parse_count(&keyword, arg)?),
        "redo" => ScriptCommand::Redo(parse_count(&keyword, arg)?),
        "goto" => ScriptCommand::GoTo(parse_target(arg)?),
        "show" => no_args(&keyword, arg, ScriptCommand::Show)?,
        "history" => no_args(&keyword, arg, ScriptCommand::History)?,
        "status" => no_args(&keyword, arg, ScriptCommand::Status)?,
        "clear" => no_args(&keyword, arg, ScriptCommand::Clear)?,
        "quit" | "exit" => no_args(&keyword, arg, ScriptCommand::Quit)?,
        _ => return Err(format!("unknown command `{keyword}`")),
    };
    Ok(Some(command))
}

pub(crate) fn parse_int(keyword: &str, arg: &str) -> Result<i64, String> {
    if arg.is_empty() {
        return Err(format!("`{keyword}` needs an integer"));
    }
    arg.parse()
        .map_err(|_| format!("`{keyword}` expects an integer, got `{arg}`"))
}

fn parse_count(keyword: &str, arg: &str) -> Result<usize, String> {
    if arg.is_empty() {
        return Ok(1);
    }
    match arg.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!(
            "`{keyword}` expects a positive count, got `{arg}`"
        )),
        Ok(n) => Ok(n),
    }
}

fn parse_target(arg: &str) -> Result<Option<usize>, String> {
    if arg.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    arg.parse()
        .map(Some)
        .map_err(|_| format!("`goto` expects an entry index or `none`, got `{arg}`"))
}

fn no_args(keyword: &str, arg: &str, command: ScriptCommand) -> Result<ScriptCommand, String> {
    if arg.is_empty() {
        Ok(command)
    } else {
        Err(format!("`{keyword}` takes no arguments"))
    }
}
