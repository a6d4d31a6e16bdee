//! Read-execute-print loop shared by both sessions.

use std::io::{BufRead, Write};

use crate::error::{PlaygroundError, Result};
use crate::script::{ScriptCommand, parse_line};
use crate::session::{Reply, Session};

/// How replies are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub format: OutputFormat,
    /// Abort on the first bad line instead of reporting it and moving on.
    pub strict: bool,
    /// Print `> ` before reading each line.
    pub prompt: bool,
    /// Print each command before its reply (text format only).
    pub echo: bool,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines: usize,
    pub executed: usize,
    pub errors: usize,
}

/// Feed `input` to `session` line by line.
///
/// Replies go to `out`. In non-strict mode, bad lines are reported on
/// `diag` and skipped; in strict mode the first one is returned as a
/// [`PlaygroundError::Parse`] carrying its line number.
pub fn run_session<S, R, W, D>(
    session: &mut S,
    input: R,
    out: &mut W,
    diag: &mut D,
    options: RunOptions,
) -> Result<RunSummary>
where
    S: Session,
    R: BufRead,
    W: Write,
    D: Write,
{
    let mut summary = RunSummary::default();
    let mut lines = input.lines();

    loop {
        if options.prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else { break };
        let line = line?;
        summary.lines += 1;
        let line_no = summary.lines;

        let outcome = parse_line(&line)
            .map_err(|message| PlaygroundError::Parse {
                line: line_no,
                message,
            })
            .and_then(|parsed| match parsed {
                None => Ok(None),
                Some(ScriptCommand::Quit) => Ok(Some(None)),
                Some(command) => session
                    .execute(&command)
                    .map(|reply| Some(Some((command, reply))))
                    .map_err(|e| e.at_line(line_no)),
            });

        match outcome {
            Ok(None) => {}
            Ok(Some(None)) => {
                tracing::debug!(line = line_no, "quit");
                break;
            }
            Ok(Some(Some((command, reply)))) => {
                summary.executed += 1;
                tracing::debug!(
                    mode = session.mode(),
                    line = line_no,
                    command = command.name(),
                    changed = ?reply.changed,
                    "command executed"
                );
                write_reply(out, &command, &reply, options)?;
            }
            Err(error) if options.strict => return Err(error),
            Err(error) => {
                summary.errors += 1;
                tracing::debug!(line = line_no, %error, "command rejected");
                writeln!(diag, "{error}")?;
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

fn write_reply<W: Write>(
    out: &mut W,
    command: &ScriptCommand,
    reply: &Reply,
    options: RunOptions,
) -> Result<()> {
    match options.format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, reply)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if options.echo {
                writeln!(out, "> {command}")?;
            }
            writeln!(out, "{}", reply.to_text())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CalculatorSession, MementoSession};
    use rewind_history::HistoryConfig;

    fn run_calc(script: &str, options: RunOptions) -> (Result<RunSummary>, String, String) {
        let mut session = CalculatorSession::new(0, HistoryConfig::default());
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let result = run_session(&mut session, script.as_bytes(), &mut out, &mut diag, options);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn text_output_per_command() {
        let (result, out, diag) = run_calc(
            "add 10\nsub 5\n# comment\n\nundo\n",
            RunOptions::default(),
        );
        let summary = result.unwrap();
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.executed, 3);
        assert_eq!(out, "10 [0/1]\n5 [1/2]\n10 [0/2]\n");
        assert!(diag.is_empty());
    }

    #[test]
    fn quit_stops_reading() {
        let (result, out, _) = run_calc("add 1\nquit\nadd 2\n", RunOptions::default());
        let summary = result.unwrap();
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.lines, 2);
        assert_eq!(out, "1 [0/1]\n");
    }

    #[test]
    fn lenient_mode_reports_and_continues() {
        let (result, out, diag) = run_calc("add 1\nbogus\nadd 2\n", RunOptions::default());
        let summary = result.unwrap();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.executed, 2);
        assert_eq!(diag, "line 2: unknown command `bogus`\n");
        assert!(out.ends_with("3 [1/2]\n"));
    }

    #[test]
    fn rejected_lines_stay_below_warn() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct LevelCapture(Arc<Mutex<Vec<tracing::Level>>>);

        impl<S: tracing::Subscriber> Layer<S> for LevelCapture {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                self.0.lock().unwrap().push(*event.metadata().level());
            }
        }

        let levels = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(LevelCapture(levels.clone()));
        let (result, _, diag) = tracing::subscriber::with_default(subscriber, || {
            run_calc("add 1\nbogus\nadd x\n", RunOptions::default())
        });

        assert_eq!(result.unwrap().errors, 2);
        assert_eq!(diag.lines().count(), 2);
        let levels = levels.lock().unwrap();
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|l| *l >= tracing::Level::DEBUG), "{levels:?}");
    }

    #[test]
    fn strict_mode_aborts_with_line_number() {
        let options = RunOptions {
            strict: true,
            ..RunOptions::default()
        };
        let (result, out, _) = run_calc("add 1\n\nset x\nadd 2\n", options);
        let err = result.unwrap_err();
        assert!(matches!(err, PlaygroundError::Parse { line: 3, .. }));
        assert_eq!(out, "1 [0/1]\n");
    }

    #[test]
    fn json_lines() {
        let options = RunOptions {
            format: OutputFormat::Json,
            ..RunOptions::default()
        };
        let (result, out, _) = run_calc("add 4\nundo\nundo\n", options);
        assert_eq!(result.unwrap().executed, 3);

        let replies: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["value"], 4);
        assert_eq!(replies[1]["changed"], true);
        assert_eq!(replies[1]["status"]["cursor"], serde_json::Value::Null);
        assert_eq!(replies[2]["changed"], false);
        assert!(replies[0].get("entries").is_none());
    }

    #[test]
    fn echo_and_prompt() {
        let mut session = MementoSession::new(HistoryConfig::default(), false);
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let options = RunOptions {
            echo: true,
            prompt: true,
            ..RunOptions::default()
        };
        run_session(&mut session, "set hi\n".as_bytes(), &mut out, &mut diag, options).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "> > set hi\n\"hi\" [0/1]\n> "
        );
    }
}
