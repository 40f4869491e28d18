//! Ordered option and property collections.

use crate::{ComponentError, ConfigOption};
use cf3_types::{TypedValue, Uri, Value, ValueType};

/// Options of one component, in declaration order.
#[derive(Debug, Default)]
pub struct OptionList {
    owner: Uri,
    options: Vec<ConfigOption>,
}

impl OptionList {
    pub(crate) fn set_owner(&mut self, owner: Uri) {
        for option in &mut self.options {
            option.set_owner(owner.clone());
        }
        self.owner = owner;
    }

    /// Declares an option whose type is the type of `default`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::DuplicateOption`] when the name is taken.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        default: impl Into<Value>,
    ) -> Result<&mut ConfigOption, ComponentError> {
        let default = default.into();
        let value_type = default.value_type();
        self.add_typed(name, value_type, default)
    }

    /// Declares an option with an explicit type, e.g.
    /// [`ValueType::Component`] for component references.
    ///
    /// # Errors
    ///
    /// [`ComponentError::DuplicateOption`] when the name is taken,
    /// [`ComponentError::TypeError`] when `default` does not conform.
    pub fn add_typed(
        &mut self,
        name: impl Into<String>,
        value_type: ValueType,
        default: impl Into<Value>,
    ) -> Result<&mut ConfigOption, ComponentError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ComponentError::DuplicateOption {
                component: self.owner.to_string(),
                option: name,
            });
        }
        let default = default.into();
        let found = default.value_type();
        let default = default
            .coerce(value_type)
            .map_err(|_| ComponentError::TypeError {
                component: self.owner.to_string(),
                option: name.clone(),
                expected: value_type,
                found,
            })?;
        self.options.push(ConfigOption::new(self.owner.clone(), name, value_type, default));
        let index = self.options.len() - 1;
        Ok(&mut self.options[index])
    }

    /// Declares an unset component-reference option.
    ///
    /// # Errors
    ///
    /// [`ComponentError::DuplicateOption`] when the name is taken.
    pub fn add_component_ref(
        &mut self,
        name: impl Into<String>,
    ) -> Result<&mut ConfigOption, ComponentError> {
        self.add_typed(name, ValueType::Component, Uri::default())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigOption> {
        self.options.iter().find(|o| o.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ConfigOption> {
        self.options.iter_mut().find(|o| o.name() == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`].
    pub fn option(&self, name: &str) -> Result<&ConfigOption, ComponentError> {
        self.get(name).ok_or_else(|| ComponentError::OptionNotFound {
            component: self.owner.to_string(),
            option: name.to_string(),
        })
    }

    /// Current value of `name`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`].
    pub fn value(&self, name: &str) -> Result<&Value, ComponentError> {
        self.option(name).map(ConfigOption::value)
    }

    /// Current value of `name` as `T`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`], or
    /// [`ComponentError::TypeError`] when `T` does not match the
    /// declared type.
    pub fn value_as<T: TypedValue>(&self, name: &str) -> Result<T, ComponentError> {
        let option = self.option(name)?;
        option.value_as().ok_or_else(|| ComponentError::TypeError {
            component: self.owner.to_string(),
            option: name.to_string(),
            expected: T::TYPE,
            found: option.value_type(),
        })
    }

    /// Removes a declaration.
    pub fn remove(&mut self, name: &str) -> Option<ConfigOption> {
        let index = self.options.iter().position(|o| o.name() == name)?;
        Some(self.options.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(ConfigOption::name)
    }

    /// Options flagged with [`ConfigOption::mark_basic`].
    pub fn basic(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.iter().filter(|o| o.is_basic())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Informational name → value store.
///
/// Unlike options, properties are not type-checked or triggered; actions
/// use them to publish state such as counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyList {
    entries: Vec<(String, Value)>,
}

impl PropertyList {
    /// Sets or replaces a property. A replaced key keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    #[must_use]
    pub fn get_as<T: TypedValue>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(T::from_value)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
