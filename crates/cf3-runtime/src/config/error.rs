//! Configuration errors.

use cf3_types::ErrorCode;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// File operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Read,
    Write,
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::CreateDir => "create directory",
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot {op} '{path}': {source}")]
    Io {
        op: FileOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid TOML or does not match [`Cf3Config`](super::Cf3Config).
    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// An environment variable holds a value its field cannot take.
    #[error("{var}={value:?} is invalid, expected {expected}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    /// `[logging] level` names no tracing level.
    #[error("unknown log level '{0}', expected one of trace, debug, info, warn, error, off")]
    UnknownLogLevel(String),
}

impl ConfigError {
    pub(crate) fn io(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Path of the file involved, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { op: FileOp::Read, .. } => "CONFIG_READ",
            Self::Io { op: FileOp::Write, .. } => "CONFIG_WRITE",
            Self::Io { op: FileOp::CreateDir, .. } => "CONFIG_CREATE_DIR",
            Self::Parse { .. } => "CONFIG_PARSE",
            Self::Serialize(_) => "CONFIG_SERIALIZE",
            Self::InvalidEnv { .. } => "CONFIG_INVALID_ENV",
            Self::UnknownLogLevel(_) => "CONFIG_LOG_LEVEL",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
