//! Script errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`SyntaxError`] | `SCRIPT_SYNTAX` | No |
//! | [`ScriptError::Syntax`] | `SCRIPT_SYNTAX` | No |
//! | [`ScriptError::Command`] | code of the component error | as the component error |
//! | [`ScriptError::ReadFile`] | `SCRIPT_READ_FILE` | No |

use cf3_component::ComponentError;
use cf3_signal::FrameError;
use cf3_types::{ErrorCode, UriError};
use std::path::PathBuf;
use thiserror::Error;

/// A line that does not form a command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument '{token}'")]
    UnexpectedArgument { command: &'static str, token: String },

    #[error("invalid path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: UriError,
    },

    #[error(transparent)]
    Tokenize(#[from] FrameError),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

impl ErrorCode for SyntaxError {
    fn code(&self) -> &'static str {
        "SCRIPT_SYNTAX"
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Failure while running a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Syntax {
        line: usize,
        #[source]
        source: SyntaxError,
    },

    #[error("line {line}: `{command}`: {source}")]
    Command {
        line: usize,
        command: String,
        #[source]
        source: ComponentError,
    },

    #[error("cannot read script {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptError {
    /// Line number of the failing command, starting at 1.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } | Self::Command { line, .. } => Some(*line),
            Self::ReadFile { .. } => None,
        }
    }

    /// The component error behind a failed command.
    #[must_use]
    pub fn component_error(&self) -> Option<&ComponentError> {
        match self {
            Self::Command { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ErrorCode for ScriptError {
    fn code(&self) -> &'static str {
        match self {
            Self::Syntax { source, .. } => source.code(),
            Self::Command { source, .. } => source.code(),
            Self::ReadFile { .. } => "SCRIPT_READ_FILE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Command { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_reports_component_code() {
        let err = ScriptError::Command {
            line: 4,
            command: "execute /step".into(),
            source: ComponentError::setup("cpath:/step", "option 'time' is unset"),
        };
        assert_eq!(err.code(), "COMPONENT_SETUP_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.line(), Some(4));
        let msg = err.to_string();
        assert!(msg.starts_with("line 4:"));
        assert!(msg.contains("cpath:/step"));
    }

    #[test]
    fn syntax_error_code() {
        let err = ScriptError::Syntax {
            line: 1,
            source: SyntaxError::UnknownCommand("frobnicate".into()),
        };
        assert_eq!(err.code(), "SCRIPT_SYNTAX");
        assert!(err.to_string().contains("frobnicate"));
        assert!(err.component_error().is_none());
    }
}
