//! Component names.
//!
//! A name is a single path segment. It must be non-empty, must not be
//! `.` or `..`, and must not contain `/`, `:` or whitespace, so that
//! every component path can be printed and re-parsed unambiguously.

use crate::ErrorCode;
use thiserror::Error;

/// Reasons a string is not a valid component name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("component name must not be empty")]
    Empty,

    #[error("component name '{0}' is reserved")]
    Reserved(String),

    #[error("component name '{name}' contains invalid character {ch:?}")]
    InvalidCharacter { name: String, ch: char },
}

impl ErrorCode for NameError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "NAME_EMPTY",
            Self::Reserved(_) => "NAME_RESERVED",
            Self::InvalidCharacter { .. } => "NAME_INVALID_CHARACTER",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Checks a candidate component name.
///
/// # Errors
///
/// Returns the first rule the name breaks.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name == "." || name == ".." {
        return Err(NameError::Reserved(name.to_string()));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| *c == '/' || *c == ':' || c.is_whitespace())
    {
        return Err(NameError::InvalidCharacter {
            name: name.to_string(),
            ch,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error_codes;

    #[test]
    fn accepts_usual_names() {
        for name in ["solver", "bc", "inlet_1", "Time-Step", "v2.0"] {
            assert!(validate_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_separators_and_reserved() {
        assert_eq!(validate_name(""), Err(NameError::Empty));
        assert_eq!(validate_name(".."), Err(NameError::Reserved("..".into())));
        assert!(matches!(
            validate_name("a/b"),
            Err(NameError::InvalidCharacter { ch: '/', .. })
        ));
        assert!(matches!(
            validate_name("cpath:x"),
            Err(NameError::InvalidCharacter { ch: ':', .. })
        ));
        assert!(validate_name("two words").is_err());
    }

    #[test]
    fn error_codes() {
        assert_error_codes(
            &[
                NameError::Empty,
                NameError::Reserved(".".into()),
                NameError::InvalidCharacter {
                    name: "a b".into(),
                    ch: ' ',
                },
            ],
            "NAME_",
        );
    }
}
