//! Configuration options.
//!
//! A [`ConfigOption`] is a named, typed, documented value owned by a
//! component. It is declared once with a default and then changed only
//! through [`Component::configure_option`](crate::Component::configure_option),
//! which type-checks the new value, enforces the restricted list, writes
//! it through to linked variables and fires triggers.
//!
//! ```text
//! configure_option(name, v)
//!   │
//!   ├─ coerce v to declared type ──────► TypeError (value unchanged)
//!   ├─ check restricted list ──────────► RestrictedValue (value unchanged)
//!   ├─ commit
//!   ├─ write through to every linked SharedValue
//!   └─ fire triggers in registration order ─► first error surfaces,
//!                                             value stays committed
//! ```
//!
//! # Example
//!
//! ```
//! use cf3_component::{Component, SharedValue};
//!
//! let mut time = Component::new("time");
//! let dt = SharedValue::new(0.0_f64);
//! time.options_mut()
//!     .add("time_step", 0.1_f64)
//!     .unwrap()
//!     .set_pretty_name("Time Step")
//!     .mark_basic()
//!     .link_to(&dt)
//!     .unwrap();
//!
//! time.configure_option("time_step", 0.5_f64).unwrap();
//! assert_eq!(dt.get(), 0.5);
//! ```

use crate::{Component, ComponentError};
use cf3_types::{TypedValue, Uri, Value, ValueType};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Callback fired after an option value is committed.
///
/// Receives the owning component and the committed value.
pub type Trigger = Arc<dyn Fn(&mut Component, &Value) -> Result<(), ComponentError> + Send + Sync>;

/// Write-through target of an option.
trait LinkedSink: Send + Sync {
    /// Declared type of the variable.
    fn value_type(&self) -> ValueType;

    /// Stores `value`, returning false when it does not convert.
    fn store(&self, value: &Value) -> bool;
}

/// A variable that mirrors an option's value.
///
/// Clones share the same storage.
pub struct SharedValue<T>(Arc<RwLock<T>>);

impl<T: TypedValue> SharedValue<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self(Arc::new(RwLock::new(initial)))
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.0.read().clone()
    }

    /// Overwrites the variable. The option itself is not changed.
    pub fn set(&self, value: T) {
        *self.0.write() = value;
    }
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: TypedValue + fmt::Debug> fmt::Debug for SharedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedValue").field(&*self.0.read()).finish()
    }
}

impl<T: TypedValue> LinkedSink for SharedValue<T> {
    fn value_type(&self) -> ValueType {
        T::TYPE
    }

    fn store(&self, value: &Value) -> bool {
        match T::from_value(value) {
            Some(converted) => {
                *self.0.write() = converted;
                true
            }
            None => false,
        }
    }
}

/// A declared option.
pub struct ConfigOption {
    owner: Uri,
    name: String,
    value_type: ValueType,
    value: Value,
    default_value: Value,
    description: String,
    pretty_name: String,
    basic: bool,
    restricted: Vec<Value>,
    tags: BTreeSet<String>,
    triggers: Vec<Trigger>,
    links: Vec<Arc<dyn LinkedSink>>,
    pub(crate) firing: bool,
}

impl ConfigOption {
    /// `default` must already conform to `value_type`.
    pub(crate) fn new(owner: Uri, name: String, value_type: ValueType, default: Value) -> Self {
        Self {
            owner,
            name,
            value_type,
            value: default.clone(),
            default_value: default,
            description: String::new(),
            pretty_name: String::new(),
            basic: false,
            restricted: Vec::new(),
            tags: BTreeSet::new(),
            triggers: Vec::new(),
            links: Vec::new(),
            firing: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Current value converted to `T`.
    #[must_use]
    pub fn value_as<T: TypedValue>(&self) -> Option<T> {
        T::from_value(&self.value)
    }

    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.value == self.default_value
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Display name; falls back to the option name.
    #[must_use]
    pub fn pretty_name(&self) -> &str {
        if self.pretty_name.is_empty() {
            &self.name
        } else {
            &self.pretty_name
        }
    }

    #[must_use]
    pub fn is_basic(&self) -> bool {
        self.basic
    }

    /// Allowed values; empty when unrestricted.
    #[must_use]
    pub fn restricted_list(&self) -> &[Value] {
        &self.restricted
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_pretty_name(&mut self, pretty_name: impl Into<String>) -> &mut Self {
        self.pretty_name = pretty_name.into();
        self
    }

    pub fn mark_basic(&mut self) -> &mut Self {
        self.basic = true;
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.insert(tag.into());
        self
    }

    /// Restricts the option to `values`. The current value is always
    /// part of the list. Values that do not conform to the declared type
    /// are dropped with a warning.
    pub fn set_restricted_list<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut allowed = vec![self.value.clone()];
        for value in values {
            match value.into().coerce(self.value_type) {
                Ok(v) if !allowed.contains(&v) => allowed.push(v),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(option = %self.name, error = %err, "restricted value dropped");
                }
            }
        }
        self.restricted = allowed;
        self
    }

    /// Appends a trigger. Triggers fire in registration order.
    pub fn attach_trigger<F>(&mut self, trigger: F) -> &mut Self
    where
        F: Fn(&mut Component, &Value) -> Result<(), ComponentError> + Send + Sync + 'static,
    {
        self.triggers.push(Arc::new(trigger));
        self
    }

    pub(crate) fn set_owner(&mut self, owner: Uri) {
        self.owner = owner;
    }

    /// Links a variable. It receives the current value now and every
    /// committed value afterwards.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeError`] when some value of the declared type
    /// could not be stored in `T`.
    pub fn link_to<T: TypedValue>(&mut self, variable: &SharedValue<T>) -> Result<&mut Self, ComponentError> {
        if !self.value_type.widens_to(T::TYPE) || !variable.store(&self.value) {
            return Err(ComponentError::TypeError {
                component: self.owner.to_string(),
                option: self.name.clone(),
                expected: T::TYPE,
                found: self.value_type,
            });
        }
        self.links.push(Arc::new(variable.clone()));
        Ok(self)
    }

    /// Type and restricted-list check, without committing.
    pub(crate) fn check(&self, owner: &Uri, value: Value) -> Result<Value, ComponentError> {
        let found = value.value_type();
        let value = value
            .coerce(self.value_type)
            .map_err(|_| ComponentError::TypeError {
                component: owner.to_string(),
                option: self.name.clone(),
                expected: self.value_type,
                found,
            })?;
        if !self.restricted.is_empty() && !self.restricted.contains(&value) {
            return Err(ComponentError::RestrictedValue {
                component: owner.to_string(),
                option: self.name.clone(),
                value: value.to_string(),
                allowed: self.restricted.iter().map(Value::to_string).collect(),
            });
        }
        Ok(value)
    }

    /// Stores an already checked value and writes it through.
    pub(crate) fn commit(&mut self, value: Value) {
        for link in &self.links {
            if !link.store(&value) {
                tracing::error!(
                    component = %self.owner,
                    option = %self.name,
                    linked = %link.value_type(),
                    value = %value,
                    "linked variable rejected a checked value"
                );
            }
        }
        self.value = value;
    }

    pub(crate) fn triggers(&self) -> Vec<Trigger> {
        self.triggers.clone()
    }
}

impl fmt::Debug for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOption")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("value", &self.value)
            .field("basic", &self.basic)
            .field("triggers", &self.triggers.len())
            .field("links", &self.links.len())
            .finish()
    }
}
