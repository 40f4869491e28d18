//! Component layer errors.
//!
//! Every failure of a tree, option, builder, signal or link operation is
//! a [`ComponentError`]. Variants that concern a component carry its full
//! path, and option or signal errors carry the option or signal name, so
//! a message alone locates the problem.
//!
//! # Error Code Convention
//!
//! All component errors use the `COMPONENT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`ChildNotFound`](ComponentError::ChildNotFound) | `COMPONENT_CHILD_NOT_FOUND` | No |
//! | [`OptionNotFound`](ComponentError::OptionNotFound) | `COMPONENT_OPTION_NOT_FOUND` | No |
//! | [`NameConflict`](ComponentError::NameConflict) | `COMPONENT_NAME_CONFLICT` | No |
//! | [`InvalidName`](ComponentError::InvalidName) | `COMPONENT_INVALID_NAME` | No |
//! | [`InvalidPath`](ComponentError::InvalidPath) | `COMPONENT_INVALID_PATH` | No |
//! | [`TypeMismatch`](ComponentError::TypeMismatch) | `COMPONENT_TYPE_MISMATCH` | No |
//! | [`DuplicateOption`](ComponentError::DuplicateOption) | `COMPONENT_DUPLICATE_OPTION` | No |
//! | [`TypeError`](ComponentError::TypeError) | `COMPONENT_TYPE_ERROR` | No |
//! | [`RestrictedValue`](ComponentError::RestrictedValue) | `COMPONENT_RESTRICTED_VALUE` | No |
//! | [`Expired`](ComponentError::Expired) | `COMPONENT_EXPIRED` | Yes |
//! | [`DuplicateBuilder`](ComponentError::DuplicateBuilder) | `COMPONENT_DUPLICATE_BUILDER` | No |
//! | [`UnknownBuilder`](ComponentError::UnknownBuilder) | `COMPONENT_UNKNOWN_BUILDER` | No |
//! | [`DuplicateSignal`](ComponentError::DuplicateSignal) | `COMPONENT_DUPLICATE_SIGNAL` | No |
//! | [`UnknownSignal`](ComponentError::UnknownSignal) | `COMPONENT_UNKNOWN_SIGNAL` | No |
//! | [`ArgumentError`](ComponentError::ArgumentError) | `COMPONENT_ARGUMENT_ERROR` | No |
//! | [`SetupError`](ComponentError::SetupError) | `COMPONENT_SETUP_ERROR` | Yes |
//! | [`ExecutionFailed`](ComponentError::ExecutionFailed) | `COMPONENT_EXECUTION_FAILED` | Yes |
//!
//! `Expired` and `SetupError` are recoverable: re-linking or configuring
//! the missing option and calling again may succeed.
//!
//! # Example
//!
//! ```
//! use cf3_component::ComponentError;
//! use cf3_types::{ErrorCode, ValueType};
//!
//! let err = ComponentError::TypeError {
//!     component: "cpath:/time".into(),
//!     option: "time_step".into(),
//!     expected: ValueType::Real,
//!     found: ValueType::String,
//! };
//! assert_eq!(err.code(), "COMPONENT_TYPE_ERROR");
//! assert!(err.to_string().contains("cpath:/time"));
//! assert!(err.to_string().contains("time_step"));
//! ```

use cf3_signal::FrameError;
use cf3_types::{ErrorCode, NameError, UriError, ValueType};
use thiserror::Error;

/// Component layer error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
    #[error("{component}: no child named '{name}'")]
    ChildNotFound { component: String, name: String },

    #[error("{component}: no option named '{option}'")]
    OptionNotFound { component: String, option: String },

    #[error("{component}: a child named '{name}' already exists")]
    NameConflict { component: String, name: String },

    #[error("invalid component name: {0}")]
    InvalidName(#[from] NameError),

    #[error("{component}: cannot resolve '{path}': {reason}")]
    InvalidPath {
        component: String,
        path: String,
        reason: String,
    },

    /// The component exists but is not of the requested kind.
    #[error("{component}: expected a {expected}, found type '{found}'")]
    TypeMismatch {
        component: String,
        expected: String,
        found: String,
    },

    #[error("{component}: option '{option}' is already declared")]
    DuplicateOption { component: String, option: String },

    #[error("{component}: option '{option}' expects {expected}, got {found}")]
    TypeError {
        component: String,
        option: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error(
        "{component}: option '{option}' = '{value}' is not one of [{}]",
        .allowed.join(", ")
    )]
    RestrictedValue {
        component: String,
        option: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A link or component reference points at a path that no longer
    /// resolves.
    #[error("{component}: link target '{target}' has expired")]
    Expired { component: String, target: String },

    #[error("builder '{type_name}' is already registered in namespace '{namespace}'")]
    DuplicateBuilder { namespace: String, type_name: String },

    #[error("no builder registered for '{type_name}'")]
    UnknownBuilder { type_name: String },

    #[error("{component}: signal '{signal}' is already registered")]
    DuplicateSignal { component: String, signal: String },

    #[error("{component}: no signal named '{signal}'")]
    UnknownSignal { component: String, signal: String },

    #[error("{component}: signal '{signal}': {source}")]
    ArgumentError {
        component: String,
        signal: String,
        #[source]
        source: FrameError,
    },

    /// The component is missing configuration it needs.
    #[error("{component}: setup error: {reason}")]
    SetupError { component: String, reason: String },

    /// Domain failure raised by an action, trigger or signal handler.
    #[error("{component}: execution failed: {reason}")]
    ExecutionFailed { component: String, reason: String },
}

impl ComponentError {
    /// Shorthand for [`SetupError`](Self::SetupError).
    pub fn setup(component: impl ToString, reason: impl Into<String>) -> Self {
        Self::SetupError {
            component: component.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ExecutionFailed`](Self::ExecutionFailed).
    pub fn failed(component: impl ToString, reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            component: component.to_string(),
            reason: reason.into(),
        }
    }

    /// Wraps a URI error met while resolving `path` from `component`.
    pub fn invalid_path(component: impl ToString, path: impl ToString, err: &UriError) -> Self {
        Self::InvalidPath {
            component: component.to_string(),
            path: path.to_string(),
            reason: err.to_string(),
        }
    }

    /// Path of the component the error is about, when known.
    #[must_use]
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::ChildNotFound { component, .. }
            | Self::OptionNotFound { component, .. }
            | Self::NameConflict { component, .. }
            | Self::InvalidPath { component, .. }
            | Self::TypeMismatch { component, .. }
            | Self::DuplicateOption { component, .. }
            | Self::TypeError { component, .. }
            | Self::RestrictedValue { component, .. }
            | Self::Expired { component, .. }
            | Self::DuplicateSignal { component, .. }
            | Self::UnknownSignal { component, .. }
            | Self::ArgumentError { component, .. }
            | Self::SetupError { component, .. }
            | Self::ExecutionFailed { component, .. } => Some(component),
            Self::InvalidName(_) | Self::DuplicateBuilder { .. } | Self::UnknownBuilder { .. } => {
                None
            }
        }
    }
}

impl ErrorCode for ComponentError {
    fn code(&self) -> &'static str {
        match self {
            Self::ChildNotFound { .. } => "COMPONENT_CHILD_NOT_FOUND",
            Self::OptionNotFound { .. } => "COMPONENT_OPTION_NOT_FOUND",
            Self::NameConflict { .. } => "COMPONENT_NAME_CONFLICT",
            Self::InvalidName(_) => "COMPONENT_INVALID_NAME",
            Self::InvalidPath { .. } => "COMPONENT_INVALID_PATH",
            Self::TypeMismatch { .. } => "COMPONENT_TYPE_MISMATCH",
            Self::DuplicateOption { .. } => "COMPONENT_DUPLICATE_OPTION",
            Self::TypeError { .. } => "COMPONENT_TYPE_ERROR",
            Self::RestrictedValue { .. } => "COMPONENT_RESTRICTED_VALUE",
            Self::Expired { .. } => "COMPONENT_EXPIRED",
            Self::DuplicateBuilder { .. } => "COMPONENT_DUPLICATE_BUILDER",
            Self::UnknownBuilder { .. } => "COMPONENT_UNKNOWN_BUILDER",
            Self::DuplicateSignal { .. } => "COMPONENT_DUPLICATE_SIGNAL",
            Self::UnknownSignal { .. } => "COMPONENT_UNKNOWN_SIGNAL",
            Self::ArgumentError { .. } => "COMPONENT_ARGUMENT_ERROR",
            Self::SetupError { .. } => "COMPONENT_SETUP_ERROR",
            Self::ExecutionFailed { .. } => "COMPONENT_EXECUTION_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Expired { .. } | Self::SetupError { .. } | Self::ExecutionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf3_types::assert_error_codes;

    fn all_variants() -> Vec<ComponentError> {
        let c = || "cpath:/solver".to_string();
        vec![
            ComponentError::ChildNotFound { component: c(), name: "x".into() },
            ComponentError::OptionNotFound { component: c(), option: "x".into() },
            ComponentError::NameConflict { component: c(), name: "x".into() },
            ComponentError::InvalidName(NameError::Empty),
            ComponentError::InvalidPath {
                component: c(),
                path: "../..".into(),
                reason: "x".into(),
            },
            ComponentError::TypeMismatch {
                component: c(),
                expected: "action".into(),
                found: "Group".into(),
            },
            ComponentError::DuplicateOption { component: c(), option: "x".into() },
            ComponentError::TypeError {
                component: c(),
                option: "x".into(),
                expected: ValueType::Real,
                found: ValueType::Bool,
            },
            ComponentError::RestrictedValue {
                component: c(),
                option: "x".into(),
                value: "c".into(),
                allowed: vec!["a".into(), "b".into()],
            },
            ComponentError::Expired { component: c(), target: "cpath:/gone".into() },
            ComponentError::DuplicateBuilder {
                namespace: "ns".into(),
                type_name: "T".into(),
            },
            ComponentError::UnknownBuilder { type_name: "T".into() },
            ComponentError::DuplicateSignal { component: c(), signal: "s".into() },
            ComponentError::UnknownSignal { component: c(), signal: "s".into() },
            ComponentError::ArgumentError {
                component: c(),
                signal: "s".into(),
                source: FrameError::MissingArgument { name: "name".into() },
            },
            ComponentError::setup(c(), "time not configured"),
            ComponentError::failed(c(), "diverged"),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "COMPONENT_");
    }

    #[test]
    fn messages_carry_location() {
        for err in all_variants() {
            if let Some(component) = err.component() {
                assert!(
                    err.to_string().contains(component),
                    "{err} should mention {component}"
                );
            }
        }
    }

    #[test]
    fn option_and_signal_names_in_message() {
        let err = ComponentError::UnknownSignal {
            component: "cpath:/solver".into(),
            signal: "create_bc_action".into(),
        };
        assert!(err.to_string().contains("create_bc_action"));

        let err = ComponentError::ArgumentError {
            component: "cpath:/solver".into(),
            signal: "create_bc_action".into(),
            source: FrameError::MissingArgument { name: "regions".into() },
        };
        let msg = err.to_string();
        assert!(msg.contains("create_bc_action") && msg.contains("regions"));
    }

    #[test]
    fn recoverability() {
        let recoverable: Vec<&str> = all_variants()
            .iter()
            .filter(|e| e.is_recoverable())
            .map(ErrorCode::code)
            .collect();
        assert_eq!(
            recoverable,
            [
                "COMPONENT_EXPIRED",
                "COMPONENT_SETUP_ERROR",
                "COMPONENT_EXECUTION_FAILED"
            ]
        );
    }

    #[test]
    fn name_error_converts() {
        let err: ComponentError = NameError::Empty.into();
        assert_eq!(err.code(), "COMPONENT_INVALID_NAME");
        assert_eq!(err.component(), None);
    }
}
