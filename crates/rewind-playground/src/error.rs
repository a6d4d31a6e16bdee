use thiserror::Error;

use rewind_history::ConfigError;

pub type Result<T> = std::result::Result<T, PlaygroundError>;

#[derive(Debug, Error)]
pub enum PlaygroundError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("`{command}` is not available in {mode} mode")]
    Unsupported { command: String, mode: &'static str },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl PlaygroundError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parse { .. } | Self::Unsupported { .. } | Self::InvalidArgument { .. } => 2,
            Self::Config(_) => 3,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Attach a 1-based line number to a script error.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::Parse { message, .. } => Self::Parse { line, message },
            other => Self::Parse {
                line,
                message: other.to_string(),
            },
        }
    }
}
