//! Signal frame errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`FrameError::MissingArgument`] | `FRAME_MISSING_ARGUMENT` | No |
//! | [`FrameError::InvalidArgument`] | `FRAME_INVALID_ARGUMENT` | No |
//! | [`FrameError::RestrictedArgument`] | `FRAME_RESTRICTED_ARGUMENT` | No |
//! | [`FrameError::Syntax`] | `FRAME_SYNTAX` | No |
//! | [`FrameError::UnknownType`] | `FRAME_UNKNOWN_TYPE` | No |
//!
//! None of these are recoverable: the same frame fails the same way.
//! The component layer wraps them into `ArgumentError` together with
//! the target path and signal name.

use cf3_types::{ErrorCode, ValueError};
use thiserror::Error;

/// Argument frame error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("missing required argument '{name}'")]
    MissingArgument { name: String },

    #[error("argument '{name}': {source}")]
    InvalidArgument {
        name: String,
        #[source]
        source: ValueError,
    },

    #[error("argument '{name}' = '{value}' is not one of [{}]", .allowed.join(", "))]
    RestrictedArgument {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("malformed argument '{token}': {reason}")]
    Syntax { token: String, reason: String },

    #[error("unknown type '{ty}' in '{token}'")]
    UnknownType { token: String, ty: String },
}

impl ErrorCode for FrameError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "FRAME_MISSING_ARGUMENT",
            Self::InvalidArgument { .. } => "FRAME_INVALID_ARGUMENT",
            Self::RestrictedArgument { .. } => "FRAME_RESTRICTED_ARGUMENT",
            Self::Syntax { .. } => "FRAME_SYNTAX",
            Self::UnknownType { .. } => "FRAME_UNKNOWN_TYPE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

impl FrameError {
    /// Name of the argument involved, when there is one.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { name }
            | Self::InvalidArgument { name, .. }
            | Self::RestrictedArgument { name, .. } => Some(name),
            Self::Syntax { .. } | Self::UnknownType { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf3_types::{assert_error_codes, ValueType};

    fn all_variants() -> Vec<FrameError> {
        vec![
            FrameError::MissingArgument { name: "name".into() },
            FrameError::InvalidArgument {
                name: "dt".into(),
                source: ValueError::Mismatch {
                    expected: ValueType::Real,
                    found: ValueType::String,
                },
            },
            FrameError::RestrictedArgument {
                name: "builder".into(),
                value: "X".into(),
                allowed: vec!["ConstantBC".into()],
            },
            FrameError::Syntax {
                token: "x".into(),
                reason: "missing '='".into(),
            },
            FrameError::UnknownType {
                token: "x:matrix=1".into(),
                ty: "matrix".into(),
            },
        ]
    }

    #[test]
    fn codes_follow_convention() {
        assert_error_codes(&all_variants(), "FRAME_");
        assert!(all_variants().iter().all(|e| !e.is_recoverable()));
    }

    #[test]
    fn messages_name_the_argument() {
        let err = FrameError::InvalidArgument {
            name: "time_step".into(),
            source: ValueError::Mismatch {
                expected: ValueType::Real,
                found: ValueType::String,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("time_step"));
        assert!(msg.contains("real"));
        assert_eq!(err.argument(), Some("time_step"));
    }

    #[test]
    fn restricted_lists_allowed_values() {
        let msg = all_variants()[2].to_string();
        assert!(msg.contains("ConstantBC"));
    }
}
