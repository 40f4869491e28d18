//! Builder registry: create components by type name.
//!
//! Builders are grouped by namespace (the capability they provide, e.g.
//! `cf3.common.Action` or `cf3.solver.BC`). Registration happens once at
//! startup; afterwards the registry is only read, so it is shared by
//! reference with every [`ComponentContext`](crate::ComponentContext).
//!
//! ```text
//! BuilderRegistry
//! ├── cf3.common.Component   Group, Link
//! ├── cf3.common.Action      CAdvanceTime, ActionDirector
//! └── cf3.solver.BC          ConstantBC
//! ```
//!
//! # Example
//!
//! ```
//! use cf3_component::{AnyComponent, BuilderRegistry, Component};
//!
//! let mut builders = BuilderRegistry::new();
//! builders
//!     .register::<AnyComponent, _>("Mesh", |name| Ok(Component::new(name)))
//!     .unwrap()
//!     .description("Unstructured mesh");
//!
//! let mesh = builders.build("Mesh", "mesh").unwrap();
//! assert_eq!(mesh.type_name(), "Mesh");
//! assert_eq!(builders.lookup("Mesh").unwrap().namespace(), "cf3.common.Component");
//! ```

use crate::link::Link;
use crate::{AnyComponent, Component, ComponentError, ComponentKind};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Component factory. Receives the requested name.
pub type Factory = Arc<dyn Fn(&str) -> Result<Component, ComponentError> + Send + Sync>;

/// One registered builder.
#[derive(Clone)]
pub struct BuilderEntry {
    type_name: String,
    namespace: String,
    description: String,
    factory: Factory,
}

impl BuilderEntry {
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn description_text(&self) -> &str {
        &self.description
    }

    /// Sets the help text.
    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for BuilderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderEntry")
            .field("type_name", &self.type_name)
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[derive(Debug, Default)]
struct Namespace {
    name: String,
    entries: Vec<BuilderEntry>,
}

/// Registry of component builders, keyed by namespace then type name.
#[derive(Debug, Default)]
pub struct BuilderRegistry {
    namespaces: Vec<Namespace>,
}

impl BuilderRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `Group` and `Link`.
    ///
    /// # Errors
    ///
    /// As [`register_core`](Self::register_core).
    pub fn with_core() -> Result<Self, ComponentError> {
        let mut registry = Self::new();
        registry.register_core()?;
        Ok(registry)
    }

    /// Registers `Group` and `Link`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::DuplicateBuilder`] when either is already
    /// registered.
    pub fn register_core(&mut self) -> Result<(), ComponentError> {
        self.register::<AnyComponent, _>("Group", |name| Ok(Component::new(name)))?
            .description("Plain structural component");
        self.register::<AnyComponent, _>("Link", |name| Link::create(name))?
            .description("Non-owning reference to another component");
        Ok(())
    }

    /// Registers `factory` under `type_name` in the namespace of `K`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::DuplicateBuilder`] when the namespace already
    /// has that type name.
    pub fn register<K, F>(&mut self, type_name: &str, factory: F) -> Result<&mut BuilderEntry, ComponentError>
    where
        K: ComponentKind,
        F: Fn(&str) -> Result<Component, ComponentError> + Send + Sync + 'static,
    {
        self.insert(K::KIND, type_name, Arc::new(factory))
    }

    /// Registers into an explicit namespace.
    ///
    /// # Errors
    ///
    /// [`ComponentError::DuplicateBuilder`].
    pub fn register_in<F>(
        &mut self,
        namespace: &str,
        type_name: &str,
        factory: F,
    ) -> Result<&mut BuilderEntry, ComponentError>
    where
        F: Fn(&str) -> Result<Component, ComponentError> + Send + Sync + 'static,
    {
        self.insert(namespace, type_name, Arc::new(factory))
    }

    fn insert(
        &mut self,
        namespace: &str,
        type_name: &str,
        factory: Factory,
    ) -> Result<&mut BuilderEntry, ComponentError> {
        let index = match self.namespaces.iter().position(|ns| ns.name == namespace) {
            Some(index) => index,
            None => {
                self.namespaces.push(Namespace {
                    name: namespace.to_string(),
                    entries: Vec::new(),
                });
                self.namespaces.len() - 1
            }
        };
        let ns = &mut self.namespaces[index];
        if ns.entries.iter().any(|e| e.type_name == type_name) {
            return Err(ComponentError::DuplicateBuilder {
                namespace: namespace.to_string(),
                type_name: type_name.to_string(),
            });
        }
        debug!(namespace = %namespace, type_name = %type_name, "builder registered");
        ns.entries.push(BuilderEntry {
            type_name: type_name.to_string(),
            namespace: namespace.to_string(),
            description: String::new(),
            factory,
        });
        let last = ns.entries.len() - 1;
        Ok(&mut ns.entries[last])
    }

    /// First entry named `type_name`, searching namespaces in
    /// registration order.
    #[must_use]
    pub fn lookup(&self, type_name: &str) -> Option<&BuilderEntry> {
        self.namespaces
            .iter()
            .flat_map(|ns| ns.entries.iter())
            .find(|e| e.type_name == type_name)
    }

    /// Entry named `type_name` inside `namespace`.
    #[must_use]
    pub fn lookup_in(&self, namespace: &str, type_name: &str) -> Option<&BuilderEntry> {
        self.builders_in(namespace).find(|e| e.type_name == type_name)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.lookup(type_name).is_some()
    }

    /// Namespace names in registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(|ns| ns.name.as_str())
    }

    /// Entries of one namespace in registration order.
    pub fn builders_in<'s>(&'s self, namespace: &str) -> impl Iterator<Item = &'s BuilderEntry> + 's {
        self.namespaces
            .iter()
            .find(|ns| ns.name == namespace)
            .into_iter()
            .flat_map(|ns| ns.entries.iter())
    }

    /// Type names registered under the namespace of `K`.
    #[must_use]
    pub fn type_names_of<K: ComponentKind>(&self) -> Vec<String> {
        self.builders_in(K::KIND).map(|e| e.type_name.clone()).collect()
    }

    /// Every entry, namespace by namespace.
    pub fn iter(&self) -> impl Iterator<Item = &BuilderEntry> {
        self.namespaces.iter().flat_map(|ns| ns.entries.iter())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.entries.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a detached component named `name`.
    ///
    /// The result carries `type_name` as its type name.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownBuilder`], [`ComponentError::InvalidName`]
    /// or the factory's own error.
    pub fn build(&self, type_name: &str, name: &str) -> Result<Component, ComponentError> {
        let entry = self
            .lookup(type_name)
            .ok_or_else(|| ComponentError::UnknownBuilder {
                type_name: type_name.to_string(),
            })?;
        Self::run(entry, name)
    }

    /// Builds through the namespace of `K` and checks the result
    /// satisfies `K`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownBuilder`] when `type_name` is not
    /// registered for `K`, [`ComponentError::TypeMismatch`] when the
    /// built component does not satisfy `K`.
    pub fn build_abstract<K: ComponentKind>(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<Component, ComponentError> {
        let entry = self
            .lookup_in(K::KIND, type_name)
            .ok_or_else(|| ComponentError::UnknownBuilder {
                type_name: format!("{}.{type_name}", K::KIND),
            })?;
        let component = Self::run(entry, name)?;
        if K::matches(&component) {
            Ok(component)
        } else {
            Err(component.type_mismatch(K::KIND))
        }
    }

    fn run(entry: &BuilderEntry, name: &str) -> Result<Component, ComponentError> {
        cf3_types::validate_name(name)?;
        let mut component = (entry.factory)(name)?;
        component.set_name(name);
        component.set_type_name(&entry.type_name);
        debug!(type_name = %entry.type_name, name = %name, "component built");
        Ok(component)
    }
}
