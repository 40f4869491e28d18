//! Signal signatures.
//!
//! A signal may publish an [`ArgSchema`] describing its arguments.
//! Dispatch validates incoming frames against it before the handler
//! runs, so a handler never sees a missing or ill-typed argument.
//!
//! ```
//! use cf3_signal::{ArgSchema, ArgSpec, SignalArgs};
//! use cf3_types::ValueType;
//!
//! let schema = ArgSchema::new()
//!     .arg(ArgSpec::required("name", ValueType::String))
//!     .arg(ArgSpec::optional("dt", ValueType::Real, 0.1_f64));
//!
//! let frame = schema.validate(&SignalArgs::new().with("name", "t")).unwrap();
//! assert_eq!(frame.get_as::<f64>("dt").unwrap(), 0.1);
//!
//! assert!(schema.validate(&SignalArgs::new()).is_err());
//! ```

use crate::{FrameError, SignalArgs};
use cf3_types::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One argument of a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgSpec {
    pub name: String,
    pub value_type: ValueType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
    /// Allowed values; empty means unrestricted.
    #[serde(default)]
    pub restricted: Vec<Value>,
}

impl ArgSpec {
    /// An argument the caller must supply.
    #[must_use]
    pub fn required(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            description: String::new(),
            required: true,
            default: None,
            restricted: Vec::new(),
        }
    }

    /// An argument filled with `default` when absent.
    #[must_use]
    pub fn optional(
        name: impl Into<String>,
        value_type: ValueType,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            default: Some(default.into()),
            required: false,
            ..Self::required(name, value_type)
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn restricted_to<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.restricted = values.into_iter().map(Into::into).collect();
        self
    }

    fn check(&self, value: &Value) -> Result<Value, FrameError> {
        let value = value
            .clone()
            .coerce(self.value_type)
            .map_err(|source| FrameError::InvalidArgument {
                name: self.name.clone(),
                source,
            })?;
        if !self.restricted.is_empty() && !self.restricted.contains(&value) {
            return Err(FrameError::RestrictedArgument {
                name: self.name.clone(),
                value: value.to_string(),
                allowed: self.restricted.iter().map(Value::to_string).collect(),
            });
        }
        Ok(value)
    }
}

/// Ordered argument specifications of one signal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArgSchema {
    args: Vec<ArgSpec>,
}

impl ArgSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument. A later spec with the same name replaces the
    /// earlier one.
    #[must_use]
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.retain(|a| a.name != spec.name);
        self.args.push(spec);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|a| a.name == name)
    }

    /// Declared type of `name`, used as a parse hint for untyped text.
    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<ValueType> {
        self.get(name).map(|a| a.value_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Checks `args` and returns the normalised frame.
    ///
    /// Declared arguments come first in schema order with values coerced
    /// to their declared type and defaults filled in; undeclared keys
    /// follow unchanged.
    ///
    /// # Errors
    ///
    /// The first missing, ill-typed or restricted argument.
    pub fn validate(&self, args: &SignalArgs) -> Result<SignalArgs, FrameError> {
        let mut normalized = SignalArgs::new();
        for spec in &self.args {
            match args.get(&spec.name) {
                Some(value) => {
                    normalized.insert(spec.name.clone(), spec.check(value)?);
                }
                None => match &spec.default {
                    Some(default) => {
                        normalized.insert(spec.name.clone(), default.clone());
                    }
                    None if spec.required => {
                        return Err(FrameError::MissingArgument {
                            name: spec.name.clone(),
                        })
                    }
                    None => {}
                },
            }
        }
        for (key, value) in args.iter() {
            if self.get(key).is_none() {
                normalized.insert(key, value.clone());
            }
        }
        Ok(normalized)
    }
}

/// What a signal publishes about its arguments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "schema", rename_all = "snake_case")]
pub enum Signature {
    /// No signature handler registered.
    #[default]
    Unspecified,
    Described(ArgSchema),
}

impl Signature {
    #[must_use]
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }

    #[must_use]
    pub fn schema(&self) -> Option<&ArgSchema> {
        match self {
            Self::Unspecified => None,
            Self::Described(schema) => Some(schema),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = match self {
            Self::Unspecified => return f.write_str("unspecified"),
            Self::Described(schema) => schema,
        };
        for (i, spec) in schema.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}:{}", spec.name, spec.value_type)?;
            if spec.required {
                f.write_str(" (required)")?;
            } else if let Some(default) = &spec.default {
                write!(f, " = {default}")?;
            }
            if !spec.restricted.is_empty() {
                let allowed: Vec<String> = spec.restricted.iter().map(Value::to_string).collect();
                write!(f, " in [{}]", allowed.join(", "))?;
            }
            if !spec.description.is_empty() {
                write!(f, "  {}", spec.description)?;
            }
        }
        Ok(())
    }
}
