//! Text syntax for argument frames.
//!
//! Arguments are written as whitespace separated tokens:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `name:string=inlet` | typed scalar |
//! | `dt:real=0.5` | typed scalar |
//! | `regions:array[uri]=/a,/b` | typed array, comma separated |
//! | `dt=0.5` | untyped; the type comes from a hint (option or schema) |
//! | `note="two words"` | double quotes keep whitespace |
//!
//! Parsing is two-phase: [`RawArg::parse`] splits a token, then
//! [`RawArg::resolve`] turns the text into a [`Value`] once the
//! expected type is known.

use crate::{ArgSchema, FrameError, SignalArgs};
use cf3_types::{Value, ValueType};

/// Splits a line into whitespace separated tokens, honouring double
/// quotes. Quotes are removed from the resulting tokens.
///
/// # Errors
///
/// [`FrameError::Syntax`] on an unterminated quote.
pub fn tokenize(line: &str) -> Result<Vec<String>, FrameError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(FrameError::Syntax {
            token: line.to_string(),
            reason: "unterminated quote".into(),
        });
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// One `name[:type]=value` token before type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArg {
    pub name: String,
    pub ty: Option<ValueType>,
    pub text: String,
}

impl RawArg {
    /// Splits a token.
    ///
    /// # Errors
    ///
    /// [`FrameError::Syntax`] without `=` or with an empty name,
    /// [`FrameError::UnknownType`] for an unrecognised type name.
    pub fn parse(token: &str) -> Result<Self, FrameError> {
        let (key, text) = token.split_once('=').ok_or_else(|| FrameError::Syntax {
            token: token.to_string(),
            reason: "expected name[:type]=value".into(),
        })?;
        let (name, ty) = match key.split_once(':') {
            Some((name, ty_name)) => {
                let ty = ValueType::from_name(ty_name).ok_or_else(|| FrameError::UnknownType {
                    token: token.to_string(),
                    ty: ty_name.to_string(),
                })?;
                (name, Some(ty))
            }
            None => (key, None),
        };
        if name.is_empty() {
            return Err(FrameError::Syntax {
                token: token.to_string(),
                reason: "empty argument name".into(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            ty,
            text: text.to_string(),
        })
    }

    /// Parses the text. An explicit type wins over `hint`; with neither
    /// the value is a string.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidArgument`] when the text does not parse.
    pub fn resolve(&self, hint: Option<ValueType>) -> Result<Value, FrameError> {
        let ty = self.ty.or(hint).unwrap_or(ValueType::String);
        Value::parse(ty, &self.text).map_err(|source| FrameError::InvalidArgument {
            name: self.name.clone(),
            source,
        })
    }
}

/// Parses tokens into a frame, using `schema` for untyped tokens.
///
/// # Errors
///
/// The first token that fails to split or parse.
pub fn parse_args<S: AsRef<str>>(
    tokens: &[S],
    schema: Option<&ArgSchema>,
) -> Result<SignalArgs, FrameError> {
    let mut args = SignalArgs::new();
    for token in tokens {
        let raw = RawArg::parse(token.as_ref())?;
        let hint = schema.and_then(|s| s.type_of(&raw.name));
        let value = raw.resolve(hint)?;
        args.insert(raw.name, value);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgSpec;
    use cf3_types::Uri;

    #[test]
    fn tokenize_respects_quotes() {
        let tokens = tokenize(r#"call /x  note="two words" dt=1"#).unwrap();
        assert_eq!(tokens, ["call", "/x", "note=two words", "dt=1"]);
        assert!(tokenize(r#"a="open"#).is_err());
        assert_eq!(tokenize("   ").unwrap(), Vec::<String>::new());
        assert_eq!(tokenize(r#"s="""#).unwrap(), ["s="]);
    }

    #[test]
    fn raw_arg_typed_and_untyped() {
        let typed = RawArg::parse("regions:array[uri]=/a,/b").unwrap();
        assert_eq!(typed.ty, Some(ValueType::UriArray));
        assert_eq!(
            typed.resolve(None).unwrap(),
            Value::UriArray(vec![Uri::parse("/a").unwrap(), Uri::parse("/b").unwrap()])
        );

        let untyped = RawArg::parse("dt=0.5").unwrap();
        assert_eq!(untyped.ty, None);
        assert_eq!(untyped.resolve(None).unwrap(), Value::from("0.5"));
        assert_eq!(untyped.resolve(Some(ValueType::Real)).unwrap(), Value::Real(0.5));
    }

    #[test]
    fn raw_arg_errors() {
        assert!(matches!(RawArg::parse("novalue"), Err(FrameError::Syntax { .. })));
        assert!(matches!(RawArg::parse("=1"), Err(FrameError::Syntax { .. })));
        assert!(matches!(
            RawArg::parse("x:matrix=1"),
            Err(FrameError::UnknownType { .. })
        ));
        let bad = RawArg::parse("dt:real=not_a_number").unwrap();
        assert!(matches!(bad.resolve(None), Err(FrameError::InvalidArgument { .. })));
    }

    #[test]
    fn parse_args_uses_schema_hints() {
        let schema = ArgSchema::new().arg(ArgSpec::required("dt", ValueType::Real));
        let args = parse_args(&["dt=2", "label=x"][..], Some(&schema)).unwrap();
        assert_eq!(args.get("dt"), Some(&Value::Real(2.0)));
        assert_eq!(args.get("label"), Some(&Value::from("x")));
    }
}
