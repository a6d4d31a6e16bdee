use std::fs::File;
use std::io::{BufRead, BufReader, IsTerminal};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rewind_history::{ConfigError, HistoryConfig};

use crate::error::Result;
use crate::logging;
use crate::runner::{OutputFormat, RunOptions, RunSummary, run_session};
use crate::session::{CalculatorSession, MementoSession, Session};

#[derive(Debug, Parser)]
#[command(
    name = "rewind",
    about = "Undo/redo playground: a snapshot text box and a command calculator",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Print one JSON object per reply.
    #[arg(long, global = true)]
    pub json: bool,

    /// History limits file (.toml or .json).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep at most this many entries. Overrides the config file.
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Text box recorded as snapshots.
    Memento(MementoArgs),

    /// Integer accumulator recorded as reversible commands.
    Calculator(CalculatorArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct MementoArgs {
    /// Read commands from a file and stop at the first bad line.
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Do not record a snapshot when the text is unchanged.
    #[arg(long)]
    pub dedupe: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CalculatorArgs {
    /// Read commands from a file and stop at the first bad line.
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Starting value.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub start: i64,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);
    run(cli).map(|_| ())
}

pub fn run(cli: Cli) -> Result<RunSummary> {
    let config = history_config(&cli.global)?;
    tracing::debug!(max_depth = config.max_depth, "history config resolved");

    match cli.command {
        Commands::Memento(args) => {
            let mut session = MementoSession::new(config, args.dedupe);
            drive(&mut session, args.script, &cli.global)
        }
        Commands::Calculator(args) => {
            let mut session = CalculatorSession::new(args.start, config);
            drive(&mut session, args.script, &cli.global)
        }
    }
}

/// Resolve limits from `--config` then `--max-depth`.
pub fn history_config(global: &GlobalArgs) -> Result<HistoryConfig> {
    let mut config = match &global.config {
        Some(path) => HistoryConfig::from_file(path)?,
        None => HistoryConfig::default(),
    };
    if let Some(max_depth) = global.max_depth {
        config.max_depth = max_depth;
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors).into());
        }
    }
    Ok(config)
}

fn drive<S: Session>(
    session: &mut S,
    script: Option<PathBuf>,
    global: &GlobalArgs,
) -> Result<RunSummary> {
    let format = if global.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut diag = std::io::stderr();

    let (input, options): (Box<dyn BufRead>, RunOptions) = match script {
        Some(path) => {
            tracing::info!(path = %path.display(), mode = session.mode(), "running script");
            (
                Box::new(BufReader::new(File::open(&path)?)),
                RunOptions {
                    format,
                    strict: true,
                    prompt: false,
                    echo: true,
                },
            )
        }
        None => {
            let interactive = std::io::stdin().is_terminal();
            (
                Box::new(std::io::stdin().lock()),
                RunOptions {
                    format,
                    strict: false,
                    prompt: interactive && format == OutputFormat::Text,
                    echo: false,
                },
            )
        }
    };

    let summary = run_session(session, input, &mut out, &mut diag, options)?;
    tracing::debug!(
        lines = summary.lines,
        executed = summary.executed,
        errors = summary.errors,
        "session finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::PlaygroundError;

    fn script(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rewind",
            "calculator",
            "--start",
            "-5",
            "--max-depth",
            "3",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert!(cli.global.json);
        assert_eq!(cli.global.max_depth, Some(3));
        assert_eq!(cli.global.verbose, 2);
        match cli.command {
            Commands::Calculator(args) => assert_eq!(args.start, -5),
            Commands::Memento(_) => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn memento_dedupe_flag() {
        let cli = Cli::try_parse_from(["rewind", "memento", "--dedupe"]).unwrap();
        assert!(matches!(cli.command, Commands::Memento(MementoArgs { dedupe: true, .. })));
    }

    #[test]
    fn zero_max_depth_is_config_error() {
        let global = GlobalArgs {
            max_depth: Some(0),
            ..GlobalArgs::default()
        };
        let err = history_config(&global).unwrap_err();
        assert!(matches!(err, PlaygroundError::Config(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn flag_overrides_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"max_depth = 10\n").unwrap();

        let mut global = GlobalArgs {
            config: Some(file.path().to_path_buf()),
            ..GlobalArgs::default()
        };
        assert_eq!(history_config(&global).unwrap().max_depth, 10);

        global.max_depth = Some(4);
        assert_eq!(history_config(&global).unwrap().max_depth, 4);
    }

    #[test]
    fn runs_calculator_script() {
        let file = script("add 10\nsub 5\nundo\n");
        let cli = Cli {
            global: GlobalArgs::default(),
            command: Commands::Calculator(CalculatorArgs {
                script: Some(file.path().to_path_buf()),
                start: 0,
            }),
        };
        let summary = run(cli).unwrap();
        assert_eq!(summary.executed, 3);
    }

    #[test]
    fn script_errors_abort() {
        let file = script("set a\nadd 1\n");
        let cli = Cli {
            global: GlobalArgs::default(),
            command: Commands::Memento(MementoArgs {
                script: Some(file.path().to_path_buf()),
                dedupe: false,
            }),
        };
        let err = run(cli).unwrap_err();
        assert!(matches!(err, PlaygroundError::Parse { line: 2, .. }));
    }

    #[test]
    fn missing_script_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            global: GlobalArgs::default(),
            command: Commands::Calculator(CalculatorArgs {
                script: Some(dir.path().join("absent.txt")),
                start: 0,
            }),
        };
        assert!(matches!(run(cli).unwrap_err(), PlaygroundError::Io(_)));
    }
}
