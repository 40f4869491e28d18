//! The closed domain of option and signal argument values.
//!
//! [`Value`] is a tagged sum over the scalar kinds
//! `{bool, int64, uint64, real, string, uri}` and homogeneous arrays of
//! each. [`ValueType`] names a declared type; it additionally contains
//! [`ValueType::Component`], a reference to another component stored
//! as a `cpath` [`Uri`].
//!
//! # Conversions
//!
//! | Operation | Purpose |
//! |-----------|---------|
//! | [`Value::coerce`] | Type check with lossless widening only |
//! | [`Value::parse`] | Explicit text parsing (CLI, config files) |
//! | [`TypedValue`] | Rust type ↔ `Value` bridge for typed accessors |
//!
//! Widening accepted by [`Value::coerce`]:
//!
//! ```text
//! int  → real      uint → real
//! int  → uint      (when non-negative)
//! uint → int       (when it fits)
//! uri  → component (cpath scheme or empty)
//! ```
//!
//! The same rules apply element-wise to arrays. A string is never
//! implicitly parsed into a number.
//!
//! # Example
//!
//! ```
//! use cf3_types::{Value, ValueType};
//!
//! let v = Value::Int(2).coerce(ValueType::Real).unwrap();
//! assert_eq!(v, Value::Real(2.0));
//!
//! assert!(Value::from("not_a_number").coerce(ValueType::Real).is_err());
//! assert_eq!(Value::parse(ValueType::Real, "0.5").unwrap(), Value::Real(0.5));
//! ```

use crate::uri::{Scheme, Uri};
use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A declared value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int,
    Uint,
    Real,
    String,
    Uri,
    /// Reference to a component, carried as a `cpath` URI.
    Component,
    BoolArray,
    IntArray,
    UintArray,
    RealArray,
    StringArray,
    UriArray,
}

impl ValueType {
    /// Canonical name used in text frames and listings.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Uint => "unsigned",
            Self::Real => "real",
            Self::String => "string",
            Self::Uri => "uri",
            Self::Component => "component",
            Self::BoolArray => "array[bool]",
            Self::IntArray => "array[integer]",
            Self::UintArray => "array[unsigned]",
            Self::RealArray => "array[real]",
            Self::StringArray => "array[string]",
            Self::UriArray => "array[uri]",
        }
    }

    /// Parses a type name. Accepts the canonical names plus the short
    /// aliases `int`, `uint`, `double`, `str`, `path`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(inner) = name
            .strip_prefix("array[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            return Self::from_name(inner).and_then(Self::array_of);
        }
        match name {
            "bool" => Some(Self::Bool),
            "integer" | "int" => Some(Self::Int),
            "unsigned" | "uint" => Some(Self::Uint),
            "real" | "double" => Some(Self::Real),
            "string" | "str" => Some(Self::String),
            "uri" | "path" => Some(Self::Uri),
            "component" => Some(Self::Component),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::BoolArray
                | Self::IntArray
                | Self::UintArray
                | Self::RealArray
                | Self::StringArray
                | Self::UriArray
        )
    }

    /// True when every value of `self` coerces to `target`.
    #[must_use]
    pub fn widens_to(self, target: Self) -> bool {
        self == target
            || matches!(
                (self, target),
                (Self::Int | Self::Uint, Self::Real)
                    | (Self::IntArray | Self::UintArray, Self::RealArray)
                    | (Self::Component, Self::Uri)
            )
    }

    /// Element type of an array type; scalars return themselves.
    #[must_use]
    pub fn element(self) -> Self {
        match self {
            Self::BoolArray => Self::Bool,
            Self::IntArray => Self::Int,
            Self::UintArray => Self::Uint,
            Self::RealArray => Self::Real,
            Self::StringArray => Self::String,
            Self::UriArray => Self::Uri,
            scalar => scalar,
        }
    }

    /// Array type holding elements of `self`.
    #[must_use]
    pub fn array_of(self) -> Option<Self> {
        match self {
            Self::Bool => Some(Self::BoolArray),
            Self::Int => Some(Self::IntArray),
            Self::Uint => Some(Self::UintArray),
            Self::Real => Some(Self::RealArray),
            Self::String => Some(Self::StringArray),
            Self::Uri | Self::Component => Some(Self::UriArray),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type check and parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: ValueType,
        found: ValueType,
    },

    #[error("cannot parse '{text}' as {ty}: {reason}")]
    Parse {
        ty: ValueType,
        text: String,
        reason: String,
    },
}

impl ErrorCode for ValueError {
    fn code(&self) -> &'static str {
        match self {
            Self::Mismatch { .. } => "VALUE_MISMATCH",
            Self::Parse { .. } => "VALUE_PARSE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// An option or argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Real(f64),
    String(String),
    Uri(Uri),
    BoolArray(Vec<bool>),
    IntArray(Vec<i64>),
    UintArray(Vec<u64>),
    RealArray(Vec<f64>),
    StringArray(Vec<String>),
    UriArray(Vec<Uri>),
}

impl Value {
    /// The runtime type of this value. URIs report [`ValueType::Uri`]
    /// even when stored in a component-reference option.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Uint(_) => ValueType::Uint,
            Self::Real(_) => ValueType::Real,
            Self::String(_) => ValueType::String,
            Self::Uri(_) => ValueType::Uri,
            Self::BoolArray(_) => ValueType::BoolArray,
            Self::IntArray(_) => ValueType::IntArray,
            Self::UintArray(_) => ValueType::UintArray,
            Self::RealArray(_) => ValueType::RealArray,
            Self::StringArray(_) => ValueType::StringArray,
            Self::UriArray(_) => ValueType::UriArray,
        }
    }

    /// Zero value of a declared type.
    #[must_use]
    pub fn default_for(ty: ValueType) -> Self {
        match ty {
            ValueType::Bool => Self::Bool(false),
            ValueType::Int => Self::Int(0),
            ValueType::Uint => Self::Uint(0),
            ValueType::Real => Self::Real(0.0),
            ValueType::String => Self::String(String::new()),
            ValueType::Uri | ValueType::Component => Self::Uri(Uri::default()),
            ValueType::BoolArray => Self::BoolArray(Vec::new()),
            ValueType::IntArray => Self::IntArray(Vec::new()),
            ValueType::UintArray => Self::UintArray(Vec::new()),
            ValueType::RealArray => Self::RealArray(Vec::new()),
            ValueType::StringArray => Self::StringArray(Vec::new()),
            ValueType::UriArray => Self::UriArray(Vec::new()),
        }
    }

    /// Converts `self` to `target` using lossless widening only.
    ///
    /// # Errors
    ///
    /// [`ValueError::Mismatch`] when no lossless conversion exists.
    pub fn coerce(self, target: ValueType) -> Result<Self, ValueError> {
        let found = self.value_type();
        let mismatch = || ValueError::Mismatch {
            expected: target,
            found,
        };
        match (self, target) {
            (Self::Uri(uri), ValueType::Component) => {
                if uri.scheme() == Scheme::Cpath {
                    Ok(Self::Uri(uri))
                } else {
                    Err(mismatch())
                }
            }
            (value, target) if value.value_type() == target => Ok(value),
            (Self::Int(i), ValueType::Real) => Ok(Self::Real(i as f64)),
            (Self::Uint(u), ValueType::Real) => Ok(Self::Real(u as f64)),
            (Self::Int(i), ValueType::Uint) => {
                u64::try_from(i).map(Self::Uint).map_err(|_| mismatch())
            }
            (Self::Uint(u), ValueType::Int) => {
                i64::try_from(u).map(Self::Int).map_err(|_| mismatch())
            }
            (Self::IntArray(v), ValueType::RealArray) => {
                Ok(Self::RealArray(v.into_iter().map(|i| i as f64).collect()))
            }
            (Self::UintArray(v), ValueType::RealArray) => {
                Ok(Self::RealArray(v.into_iter().map(|u| u as f64).collect()))
            }
            (Self::IntArray(v), ValueType::UintArray) => v
                .into_iter()
                .map(u64::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::UintArray)
                .map_err(|_| mismatch()),
            (Self::UintArray(v), ValueType::IntArray) => v
                .into_iter()
                .map(i64::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::IntArray)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        }
    }

    /// True when [`Value::coerce`] to `target` would succeed.
    #[must_use]
    pub fn conforms_to(&self, target: ValueType) -> bool {
        self.clone().coerce(target).is_ok()
    }

    /// Parses text as a value of type `ty`.
    ///
    /// Arrays are comma separated; an empty or blank string is the
    /// empty array.
    ///
    /// # Errors
    ///
    /// [`ValueError::Parse`] naming the type and the offending text.
    pub fn parse(ty: ValueType, text: &str) -> Result<Self, ValueError> {
        if ty.is_array() {
            let trimmed = text.trim();
            let items: Vec<&str> = if trimmed.is_empty() {
                Vec::new()
            } else {
                trimmed.split(',').map(str::trim).collect()
            };
            let element = ty.element();
            let parsed = items
                .into_iter()
                .map(|item| Self::parse(element, item))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(collect_array(ty, parsed));
        }

        let parse_error = |reason: String| ValueError::Parse {
            ty,
            text: text.to_string(),
            reason,
        };
        let trimmed = text.trim();
        match ty {
            ValueType::Bool => parse_bool(trimmed)
                .map(Self::Bool)
                .ok_or_else(|| parse_error("expected true/false".into())),
            ValueType::Int => trimmed
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::Uint => trimmed
                .parse::<u64>()
                .map(Self::Uint)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::Real => trimmed
                .parse::<f64>()
                .map(Self::Real)
                .map_err(|e| parse_error(e.to_string())),
            ValueType::String => Ok(Self::String(text.to_string())),
            ValueType::Uri | ValueType::Component => {
                let uri = Uri::parse(trimmed).map_err(|e| parse_error(e.to_string()))?;
                Self::Uri(uri).coerce(ty).map_err(|e| parse_error(e.to_string()))
            }
            _ => Err(parse_error("unsupported type".into())),
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Int(i) => Some(*i as f64),
            Self::Uint(u) => Some(*u as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uri(&self) -> Option<&Uri> {
        match self {
            Self::Uri(u) => Some(u),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uri_array(&self) -> Option<&[Uri]> {
        match self {
            Self::UriArray(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            Self::StringArray(v) => Some(v),
            _ => None,
        }
    }
}

fn collect_array(ty: ValueType, items: Vec<Value>) -> Value {
    macro_rules! gather {
        ($element:ident => $array:ident) => {
            Value::$array(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::$element(x) => Some(x),
                        _ => None,
                    })
                    .collect(),
            )
        };
    }
    match ty {
        ValueType::BoolArray => {
            Value::BoolArray(items.iter().filter_map(Value::as_bool).collect())
        }
        ValueType::IntArray => Value::IntArray(items.iter().filter_map(Value::as_int).collect()),
        ValueType::UintArray => {
            Value::UintArray(items.iter().filter_map(Value::as_uint).collect())
        }
        ValueType::RealArray => {
            Value::RealArray(items.iter().filter_map(Value::as_real).collect())
        }
        ValueType::StringArray => gather!(String => StringArray),
        _ => gather!(Uri => UriArray),
    }
}

/// Parses the boolean spellings accepted in text frames and environment
/// variables: `true/false`, `1/0`, `yes/no`, `on/off`.
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn join_display<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::String(s) => f.write_str(s),
            Self::Uri(u) => write!(f, "{u}"),
            Self::BoolArray(v) => join_display(f, v),
            Self::IntArray(v) => join_display(f, v),
            Self::UintArray(v) => join_display(f, v),
            Self::RealArray(v) => join_display(f, v),
            Self::StringArray(v) => join_display(f, v),
            Self::UriArray(v) => join_display(f, v),
        }
    }
}

/// Bridge between a Rust type and the value domain.
///
/// Used by typed option accessors, linked variables and typed argument
/// getters. `from_value` applies the same widening as [`Value::coerce`].
pub trait TypedValue: Clone + Send + Sync + 'static {
    /// Declared type for options of this Rust type.
    const TYPE: ValueType;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! typed_value {
    ($rust:ty, $variant:ident, $ty:ident) => {
        impl TypedValue for $rust {
            const TYPE: ValueType = ValueType::$ty;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value.clone().coerce(Self::TYPE).ok()? {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$rust> for Value {
            fn from(value: $rust) -> Self {
                Value::$variant(value)
            }
        }
    };
}

typed_value!(bool, Bool, Bool);
typed_value!(i64, Int, Int);
typed_value!(u64, Uint, Uint);
typed_value!(f64, Real, Real);
typed_value!(String, String, String);
typed_value!(Uri, Uri, Uri);
typed_value!(Vec<bool>, BoolArray, BoolArray);
typed_value!(Vec<i64>, IntArray, IntArray);
typed_value!(Vec<u64>, UintArray, UintArray);
typed_value!(Vec<f64>, RealArray, RealArray);
typed_value!(Vec<String>, StringArray, StringArray);
typed_value!(Vec<Uri>, UriArray, UriArray);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// A component reference: a `cpath` URI declared as
/// [`ValueType::Component`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ComponentRef(pub Uri);

impl ComponentRef {
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.0
    }

    /// True when no target path is stored.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl TypedValue for ComponentRef {
    const TYPE: ValueType = ValueType::Component;

    fn into_value(self) -> Value {
        Value::Uri(self.0)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.clone().coerce(Self::TYPE).ok()? {
            Value::Uri(uri) => Some(Self(uri)),
            _ => None,
        }
    }
}

impl From<ComponentRef> for Value {
    fn from(value: ComponentRef) -> Self {
        Value::Uri(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error_codes;

    #[test]
    fn type_names_round_trip() {
        for ty in [
            ValueType::Bool,
            ValueType::Int,
            ValueType::Uint,
            ValueType::Real,
            ValueType::String,
            ValueType::Uri,
            ValueType::Component,
            ValueType::RealArray,
            ValueType::UriArray,
            ValueType::StringArray,
        ] {
            assert_eq!(ValueType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ValueType::from_name("array[double]"), Some(ValueType::RealArray));
        assert_eq!(ValueType::from_name("matrix"), None);
    }

    #[test]
    fn coerce_widens_losslessly() {
        assert_eq!(Value::Uint(3).coerce(ValueType::Real), Ok(Value::Real(3.0)));
        assert_eq!(Value::Int(3).coerce(ValueType::Uint), Ok(Value::Uint(3)));
        assert!(Value::Int(-1).coerce(ValueType::Uint).is_err());
        assert!(Value::Uint(u64::MAX).coerce(ValueType::Int).is_err());
        assert_eq!(
            Value::IntArray(vec![1, 2]).coerce(ValueType::RealArray),
            Ok(Value::RealArray(vec![1.0, 2.0]))
        );
    }

    #[test]
    fn coerce_rejects_narrowing_and_strings() {
        assert_eq!(
            Value::Real(1.0).coerce(ValueType::Int),
            Err(ValueError::Mismatch {
                expected: ValueType::Int,
                found: ValueType::Real
            })
        );
        assert!(Value::from("1.5").coerce(ValueType::Real).is_err());
        assert!(Value::Bool(true).coerce(ValueType::Int).is_err());
    }

    #[test]
    fn component_accepts_cpath_only() {
        let cpath = Value::Uri(Uri::parse("/time").unwrap());
        assert!(cpath.conforms_to(ValueType::Component));
        assert!(Value::Uri(Uri::default()).conforms_to(ValueType::Component));
        let file = Value::Uri(Uri::parse("file:/tmp/x").unwrap());
        assert!(!file.conforms_to(ValueType::Component));
        assert!(file.conforms_to(ValueType::Uri));
    }

    #[test]
    fn parse_scalars_and_arrays() {
        assert_eq!(Value::parse(ValueType::Bool, "yes"), Ok(Value::Bool(true)));
        assert_eq!(Value::parse(ValueType::Int, " -4 "), Ok(Value::Int(-4)));
        assert_eq!(
            Value::parse(ValueType::RealArray, "1, 2.5,3"),
            Ok(Value::RealArray(vec![1.0, 2.5, 3.0]))
        );
        assert_eq!(
            Value::parse(ValueType::UriArray, "/mesh/topology/inlet"),
            Ok(Value::UriArray(vec![Uri::parse("/mesh/topology/inlet").unwrap()]))
        );
        assert_eq!(Value::parse(ValueType::StringArray, ""), Ok(Value::StringArray(vec![])));
    }

    #[test]
    fn widening_is_total_only_where_lossless() {
        assert!(ValueType::Uint.widens_to(ValueType::Real));
        assert!(ValueType::Component.widens_to(ValueType::Uri));
        assert!(ValueType::String.widens_to(ValueType::String));
        assert!(!ValueType::Int.widens_to(ValueType::Uint));
        assert!(!ValueType::Real.widens_to(ValueType::String));
        assert!(!ValueType::Uri.widens_to(ValueType::Component));
    }

    #[test]
    fn parse_path_and_string_arrays_keep_array_type() {
        let regions = Value::parse(ValueType::UriArray, "/mesh/inlet, /mesh/outlet").unwrap();
        assert_eq!(regions.value_type(), ValueType::UriArray);
        assert_eq!(
            regions,
            Value::UriArray(vec![
                Uri::parse("/mesh/inlet").unwrap(),
                Uri::parse("/mesh/outlet").unwrap(),
            ])
        );
        assert_eq!(
            Value::parse(ValueType::StringArray, "CAdvanceTime"),
            Ok(Value::StringArray(vec!["CAdvanceTime".into()]))
        );
    }

    #[test]
    fn parse_failure_names_type_and_text() {
        let err = Value::parse(ValueType::Real, "not_a_number").unwrap_err();
        match err {
            ValueError::Parse { ty, text, .. } => {
                assert_eq!(ty, ValueType::Real);
                assert_eq!(text, "not_a_number");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn display_matches_parse_format() {
        let v = Value::RealArray(vec![0.5, 1.0]);
        assert_eq!(v.to_string(), "0.5,1");
        assert_eq!(Value::parse(ValueType::RealArray, &v.to_string()), Ok(v));
    }

    #[test]
    fn typed_value_bridge() {
        assert_eq!(f64::from_value(&Value::Int(2)), Some(2.0));
        assert_eq!(u64::from_value(&Value::Real(2.0)), None);
        assert_eq!(String::from_value(&Value::from("x")), Some("x".to_string()));
        let r = ComponentRef::from_value(&Value::Uri(Uri::parse("/t").unwrap())).unwrap();
        assert!(!r.is_unset());
        assert_eq!(1.5_f64.into_value(), Value::Real(1.5));
    }

    #[test]
    fn serde_tagged_representation() {
        let json = serde_json::to_string(&Value::Real(0.5)).unwrap();
        assert_eq!(json, r#"{"type":"real","value":0.5}"#);
        let back: Value = serde_json::from_str(r#"{"type":"uri_array","value":["/a"]}"#).unwrap();
        assert_eq!(back, Value::UriArray(vec![Uri::parse("/a").unwrap()]));
    }

    #[test]
    fn error_codes() {
        assert_error_codes(
            &[
                ValueError::Mismatch {
                    expected: ValueType::Real,
                    found: ValueType::String,
                },
                ValueError::Parse {
                    ty: ValueType::Int,
                    text: "x".into(),
                    reason: "bad".into(),
                },
            ],
            "VALUE_",
        );
    }
}
