//! Machine-readable error codes shared by every cf3 crate.
//!
//! Each layer of the workspace owns its own `thiserror` enum
//! (`UriError`, `ValueError`, `FrameError`, `ComponentError`, ...).
//! They all implement [`ErrorCode`] so that front ends can report a
//! stable code next to the human message and decide whether a retry
//! after user action makes sense.
//!
//! # Code Format
//!
//! | Rule | Example |
//! |------|---------|
//! | UPPER_SNAKE_CASE | `COMPONENT_NOT_FOUND` |
//! | Prefixed by the owning layer | `URI_`, `VALUE_`, `FRAME_`, `COMPONENT_` |
//! | Stable once published | renaming a code is a breaking change |
//!
//! # Example
//!
//! ```
//! use cf3_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MeshError {
//!     MissingRegion(String),
//!     Locked,
//! }
//!
//! impl ErrorCode for MeshError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::MissingRegion(_) => "MESH_MISSING_REGION",
//!             Self::Locked => "MESH_LOCKED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Locked)
//!     }
//! }
//!
//! let err = MeshError::Locked;
//! assert_eq!(err.code(), "MESH_LOCKED");
//! assert!(err.is_recoverable());
//! ```

/// Error code interface implemented by all cf3 error enums.
///
/// # Recoverability
///
/// An error is recoverable when the caller can fix the tree and try
/// again: a dangling link can be re-linked, a missing setup option can
/// be configured. Type errors, unknown names and duplicate
/// registrations are not recoverable; the same call will fail again.
pub trait ErrorCode {
    /// Stable, prefixed, UPPER_SNAKE_CASE code.
    fn code(&self) -> &'static str;

    /// Whether retrying after corrective action may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, prefixed and UPPER_SNAKE_CASE.
///
/// Intended for tests that walk every variant of an error enum.
///
/// # Panics
///
/// Panics with a descriptive message when a rule is violated.
///
/// # Example
///
/// ```
/// use cf3_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// enum SolverError { Diverged }
///
/// impl ErrorCode for SolverError {
///     fn code(&self) -> &'static str { "SOLVER_DIVERGED" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&SolverError::Diverged, "SOLVER_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Runs [`assert_error_code`] over a list of variants.
///
/// ```
/// use cf3_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum SolverError { Diverged, Stalled }
///
/// impl ErrorCode for SolverError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Diverged => "SOLVER_DIVERGED",
///             Self::Stalled => "SOLVER_STALLED",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[SolverError::Diverged, SolverError::Stalled], "SOLVER_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum ProbeError {
        Dangling,
        Invalid,
    }

    impl ErrorCode for ProbeError {
        fn code(&self) -> &'static str {
            match self {
                Self::Dangling => "PROBE_DANGLING",
                Self::Invalid => "PROBE_INVALID",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Dangling)
        }
    }

    #[test]
    fn codes_and_recoverability() {
        assert_eq!(ProbeError::Dangling.code(), "PROBE_DANGLING");
        assert!(ProbeError::Dangling.is_recoverable());
        assert_eq!(ProbeError::Invalid.code(), "PROBE_INVALID");
        assert!(!ProbeError::Invalid.is_recoverable());
    }

    #[test]
    fn all_variants_pass_convention() {
        assert_error_codes(&[ProbeError::Dangling, ProbeError::Invalid], "PROBE_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&ProbeError::Invalid, "OTHER_");
    }

    #[test]
    fn upper_snake_case_detection() {
        assert!(is_upper_snake_case("URI_ESCAPES_ROOT"));
        assert!(is_upper_snake_case("E2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("uri_error"));
        assert!(!is_upper_snake_case("_URI"));
        assert!(!is_upper_snake_case("URI_"));
        assert!(!is_upper_snake_case("URI__ROOT"));
    }
}
