//! Signal argument frames.
//!
//! A [`SignalArgs`] is an ordered mapping from argument name to
//! [`Value`]. Order is preserved through JSON serialisation so that a
//! frame prints and replays the way it was written.
//!
//! ```
//! use cf3_signal::SignalArgs;
//! use cf3_types::{Uri, Value};
//!
//! let args = SignalArgs::new()
//!     .with("name", "inlet")
//!     .with("builder", "ConstantBC")
//!     .with("regions", vec![Uri::parse("/mesh/topology/inlet").unwrap()]);
//!
//! assert_eq!(args.get_as::<String>("name").unwrap(), "inlet");
//! assert_eq!(args.keys().collect::<Vec<_>>(), ["name", "builder", "regions"]);
//! ```

use crate::FrameError;
use cf3_types::{TypedValue, Value, ValueError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered key → value frame passed to and returned from signals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalArgs {
    entries: Vec<(String, Value)>,
}

impl SignalArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Typed lookup with the same widening as option type checks.
    ///
    /// # Errors
    ///
    /// [`FrameError::MissingArgument`] when absent,
    /// [`FrameError::InvalidArgument`] when not convertible to `T`.
    pub fn get_as<T: TypedValue>(&self, key: &str) -> Result<T, FrameError> {
        let value = self.get(key).ok_or_else(|| FrameError::MissingArgument {
            name: key.to_string(),
        })?;
        T::from_value(value).ok_or_else(|| FrameError::InvalidArgument {
            name: key.to_string(),
            source: ValueError::Mismatch {
                expected: T::TYPE,
                found: value.value_type(),
            },
        })
    }

    /// Like [`get_as`](Self::get_as) but `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidArgument`] when present but ill-typed.
    pub fn get_opt<T: TypedValue>(&self, key: &str) -> Result<Option<T>, FrameError> {
        if self.contains(key) {
            self.get_as(key).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl FromIterator<(String, Value)> for SignalArgs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

impl IntoIterator for SignalArgs {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Prints the frame in text syntax, `name:type=value` separated by
/// spaces. Values containing whitespace are double quoted.
impl fmt::Display for SignalArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let text = value.to_string();
            if text.chars().any(char::is_whitespace) {
                write!(f, "{key}:{}=\"{text}\"", value.value_type())?;
            } else {
                write!(f, "{key}:{}={text}", value.value_type())?;
            }
        }
        Ok(())
    }
}

impl Serialize for SignalArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct FrameVisitor;

impl<'de> Visitor<'de> for FrameVisitor {
    type Value = SignalArgs;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of argument name to typed value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut args = SignalArgs::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            args.insert(key, value);
        }
        Ok(args)
    }
}

impl<'de> Deserialize<'de> for SignalArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FrameVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf3_types::Uri;

    #[test]
    fn insert_replaces_in_place() {
        let mut args = SignalArgs::new().with("a", 1_i64).with("b", 2_i64);
        let old = args.insert("a", 10_i64);
        assert_eq!(old, Some(Value::Int(1)));
        assert_eq!(args.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(args.get("a"), Some(&Value::Int(10)));
    }

    #[test]
    fn typed_getters() {
        let args = SignalArgs::new().with("dt", 1_i64).with("name", "x");
        assert_eq!(args.get_as::<f64>("dt").unwrap(), 1.0);
        assert!(matches!(
            args.get_as::<f64>("name"),
            Err(FrameError::InvalidArgument { .. })
        ));
        assert!(matches!(
            args.get_as::<f64>("absent"),
            Err(FrameError::MissingArgument { .. })
        ));
        assert_eq!(args.get_opt::<String>("absent").unwrap(), None);
    }

    #[test]
    fn remove_and_len() {
        let mut args = SignalArgs::new().with("a", true);
        assert_eq!(args.len(), 1);
        assert_eq!(args.remove("a"), Some(Value::Bool(true)));
        assert!(args.is_empty());
        assert_eq!(args.remove("a"), None);
    }

    #[test]
    fn json_keeps_order() {
        let args = SignalArgs::new()
            .with("zeta", 1.5_f64)
            .with("alpha", vec![Uri::parse("/a").unwrap()]);
        let json = serde_json::to_string(&args).unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
        let back: SignalArgs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, args);
    }

    #[test]
    fn display_uses_text_syntax() {
        let args = SignalArgs::new()
            .with("name", "inlet")
            .with("dt", 0.5_f64)
            .with("note", "two words");
        assert_eq!(
            args.to_string(),
            "name:string=inlet dt:real=0.5 note:string=\"two words\""
        );
    }
}
